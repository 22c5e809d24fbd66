use serde::Serialize;
use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("PARCELSTORE_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

/// How command results are written to stdout.
///
/// `Quiet` writes nothing to stdout; errors still go to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Quiet,
}

impl OutputMode {
    /// `--json` wins over quiet, quiet over human
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if json {
            OutputMode::Json
        } else if quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Human
        }
    }

    pub fn is_human(&self) -> bool {
        *self == OutputMode::Human
    }
}

#[derive(Debug, Serialize)]
struct Envelope<'a, T: Serialize> {
    ok: bool,
    command: &'a str,
    data: T,
}

/// Render a JSON success envelope for `command`
pub fn success_json<T: Serialize>(command: &str, data: T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Envelope { ok: true, command, data })
}

/// Print a JSON success envelope; no-op in human mode
pub fn emit_success<T: Serialize>(mode: OutputMode, command: &str, data: T) -> anyhow::Result<()> {
    if mode == OutputMode::Json {
        println!("{}", success_json(command, data)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_mode_flags() {
        assert_eq!(OutputMode::from_flags(false, false), OutputMode::Human);
        assert_eq!(OutputMode::from_flags(true, true), OutputMode::Json);

        let quiet = OutputMode::from_flags(false, true);
        assert_eq!(quiet, OutputMode::Quiet);
        assert!(!quiet.is_human());
        emit_success(quiet, "show", serde_json::json!({})).unwrap();
    }

    #[test]
    fn test_success_envelope() {
        let out = success_json("delete", serde_json::json!({ "number": 3 })).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["command"], "delete");
        assert_eq!(value["data"]["number"], 3);
    }
}
