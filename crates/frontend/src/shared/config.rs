//! Build-time configuration of the console.
//!
//! Values are read with `option_env!` when the wasm bundle is compiled:
//! - `ADMIN_DATA_SOURCE` = `mock` | `remote` (default `remote`)
//! - `ADMIN_AUTH_MOCK` = `true` lets every admin screen through without a session
//! - `ADMIN_API_BASE` overrides the backend base URL

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSourceKind {
    Mock,
    #[default]
    Remote,
}

pub fn parse_data_source(raw: Option<&str>) -> DataSourceKind {
    match raw.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if v == "mock" => DataSourceKind::Mock,
        Some(v) if v == "remote" || v.is_empty() => DataSourceKind::Remote,
        Some(other) => {
            log::warn!("Unknown ADMIN_DATA_SOURCE '{}', using remote", other);
            DataSourceKind::Remote
        }
        None => DataSourceKind::Remote,
    }
}

pub fn parse_flag(raw: Option<&str>) -> bool {
    matches!(raw.map(str::trim), Some("true") | Some("1"))
}

pub fn data_source_kind() -> DataSourceKind {
    parse_data_source(option_env!("ADMIN_DATA_SOURCE"))
}

pub fn auth_mock() -> bool {
    parse_flag(option_env!("ADMIN_AUTH_MOCK"))
}

pub fn api_base_override() -> Option<&'static str> {
    option_env!("ADMIN_API_BASE")
        .map(|v| v.trim().trim_end_matches('/'))
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_source() {
        assert_eq!(parse_data_source(None), DataSourceKind::Remote);
        assert_eq!(parse_data_source(Some("mock")), DataSourceKind::Mock);
        assert_eq!(parse_data_source(Some(" MOCK ")), DataSourceKind::Mock);
        assert_eq!(parse_data_source(Some("remote")), DataSourceKind::Remote);
        assert_eq!(parse_data_source(Some("")), DataSourceKind::Remote);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag(Some("true")));
        assert!(parse_flag(Some("1")));
        assert!(!parse_flag(Some("false")));
        assert!(!parse_flag(Some("yes")));
        assert!(!parse_flag(None));
    }
}
