use holodot::AppConfig;

fn main() {
    holodot::run(AppConfig::new().title("holodot — TRS transform walkthrough"));
}
