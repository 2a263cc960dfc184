mod settings;

pub use settings::Config;
pub use settings::GLOBAL_CONFIG;
