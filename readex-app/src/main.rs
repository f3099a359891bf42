mod app;

use app::App;

const DEFAULT_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let font_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_FONT.to_owned());
    let app = App::new(&font_path)?;
    app.run()
}
