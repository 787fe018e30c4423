use ChemCalc::Utils::logger::init_logger;
use ChemCalc::cli::cli_main::run_interactive_menu;
use ChemCalc::settings::SettingsManager;

pub fn main() {
    let mut manager = SettingsManager::new();
    let settings = manager.settings();
    init_logger(settings.level_filter(), settings.log_file.as_deref());
    run_interactive_menu(&mut manager);
}
