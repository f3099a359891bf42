use lazy_static::lazy_static;
use std::sync::RwLock;

pub use string_cache::DefaultAtom as Atom;

lazy_static! {
    static ref WORD_INTERNER: RwLock<Vec<Atom>> = RwLock::new(Vec::new());
}

/// Intern a stimulus word and return its stable id. The renderer keys its
/// rasterized-word cache on these ids, so a word repeated across trials is
/// rasterized once.
pub fn intern(s: &str) -> usize {
    let atom = Atom::from(s);
    let mut v = WORD_INTERNER.write().unwrap();
    match v.iter().position(|a| *a == atom) {
        Some(idx) => idx,
        None => {
            v.push(atom);
            v.len() - 1
        }
    }
}

/// Count of unique interned words.
pub fn count() -> usize {
    WORD_INTERNER.read().unwrap().len()
}

pub fn resolve(id: usize) -> String {
    WORD_INTERNER.read().unwrap()[id].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_stable_and_resolvable() {
        let a = intern("maze-word");
        let b = intern("maze-word");
        assert_eq!(a, b);
        assert_eq!(resolve(a), "maze-word");
        assert!(count() > 0);
    }
}
