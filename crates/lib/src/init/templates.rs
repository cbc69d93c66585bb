//! Template content for funcpack init.

/// Template for funcpack.toml
/// Contains {stack_name} and {extension} placeholders for substitution
pub const CONFIG_TEMPLATE: &str = r#"# funcpack project configuration

stack_name = "{stack_name}"

# Directory holding src/modules, relative to this file
source_dir = "."

[functions]
# Files matching src/modules/<module>/<function>.<extension> become functions
extension = "{extension}"
# Export referenced by handler identifiers: modules/<module>/<function>.<export>
handler_export = "default"

[build]
# Commands run in source_dir before archiving
commands = []
# Directory archived into the bundle, relative to source_dir
dist = "dist"
# timeout = "10m"

# Alternative command lists, selected with --variant <name>
[build.variants]
# local = ["npm install", "npm run build"]

[naming]
# Identifier ceiling and the suffix length the provisioning engine appends
ceiling = 64
reserved_suffix = 8

# Environment injected into every function
[env]

# Per-module environment overrides
# [modules.users.env]
# LOG_LEVEL = "debug"
"#;
