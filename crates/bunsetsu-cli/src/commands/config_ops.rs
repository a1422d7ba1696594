use std::fs;

pub fn settings_export() {
    print!("{}", bunsetsu_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(
        bunsetsu_core::settings::parse_settings_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: splitter.poisson_lambda={}, ordering.history_depth={}, matrix.max_growth_rounds={}",
        s.splitter.poisson_lambda, s.ordering.history_depth, s.matrix.max_growth_rounds
    );
}
