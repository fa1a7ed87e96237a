use crate::config::{Config, NullableMode};

const OPTION_FNS: &str = include_str!("../../templates/option_fns.ts");
const STANDARD_FNS: &str = include_str!("../../templates/standard_fns.ts");

/// The shared coercion library; its flavor follows the nullability mode.
pub fn render_library(config: &Config) -> &'static str {
    match config.nullable_mode {
        NullableMode::Option => OPTION_FNS,
        NullableMode::Nullable => STANDARD_FNS,
    }
}
