//! Template format dispatch by file extension.

use std::fmt;

/// Rendering strategy for a resolved template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateFormat {
    /// Plain text template with variable substitution.
    Yaml,
    /// Sandboxed script rendered by a [`ScriptEngine`](crate::render::ScriptEngine).
    Starlark,
    /// Data template rendered by a [`JsonnetEngine`](crate::render::JsonnetEngine).
    Jsonnet,
}

/// Extension to format table. Lookups are case-sensitive.
const FORMATS: &[(&str, TemplateFormat)] = &[
    (".yml", TemplateFormat::Yaml),
    (".yaml", TemplateFormat::Yaml),
    (".star", TemplateFormat::Starlark),
    (".starlark", TemplateFormat::Starlark),
    (".script", TemplateFormat::Starlark),
    (".jsonnet", TemplateFormat::Jsonnet),
];

impl TemplateFormat {
    /// Format for an extension (including the leading dot), if supported.
    pub fn from_extension(ext: &str) -> Option<Self> {
        FORMATS
            .iter()
            .find(|(candidate, _)| *candidate == ext)
            .map(|(_, format)| *format)
    }

    /// Format for a template name, if its extension is supported.
    pub fn for_template_name(name: &str) -> Option<Self> {
        Self::from_extension(extension(name))
    }

    /// Short lowercase label used in logs and errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateFormat::Yaml => "yaml",
            TemplateFormat::Starlark => "starlark",
            TemplateFormat::Jsonnet => "jsonnet",
        }
    }
}

impl fmt::Display for TemplateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extension of the final path element, starting at its last dot.
///
/// Returns an empty string when the final element has no dot.
pub fn extension(name: &str) -> &str {
    let file = name.rsplit('/').next().unwrap_or(name);
    match file.rfind('.') {
        Some(idx) => &file[idx..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_takes_last_dot() {
        assert_eq!(extension("plugin.yml"), ".yml");
        assert_eq!(extension("plugin.tar.jsonnet"), ".jsonnet");
        assert_eq!(extension(".drone.yml"), ".yml");
    }

    #[test]
    fn extension_ignores_dots_in_directories() {
        assert_eq!(extension("v1.2/plugin"), "");
        assert_eq!(extension("v1.2/plugin.star"), ".star");
    }

    #[test]
    fn extension_empty_without_dot() {
        assert_eq!(extension("plugin"), "");
        assert_eq!(extension(""), "");
    }

    #[test]
    fn dispatch_table_is_complete() {
        assert_eq!(TemplateFormat::from_extension(".yml"), Some(TemplateFormat::Yaml));
        assert_eq!(TemplateFormat::from_extension(".yaml"), Some(TemplateFormat::Yaml));
        assert_eq!(TemplateFormat::from_extension(".star"), Some(TemplateFormat::Starlark));
        assert_eq!(
            TemplateFormat::from_extension(".starlark"),
            Some(TemplateFormat::Starlark)
        );
        assert_eq!(TemplateFormat::from_extension(".script"), Some(TemplateFormat::Starlark));
        assert_eq!(TemplateFormat::from_extension(".jsonnet"), Some(TemplateFormat::Jsonnet));
    }

    #[test]
    fn unsupported_extensions_have_no_format() {
        for ext in [".txt", ".json", ".YML", ".Star", ""] {
            assert_eq!(TemplateFormat::from_extension(ext), None, "{ext:?}");
        }
    }

    #[test]
    fn for_template_name_uses_extension() {
        assert_eq!(
            TemplateFormat::for_template_name("greet.yml"),
            Some(TemplateFormat::Yaml)
        );
        assert_eq!(TemplateFormat::for_template_name("greet.txt"), None);
        assert_eq!(TemplateFormat::for_template_name("greet"), None);
    }
}
