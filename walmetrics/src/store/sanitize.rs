use crate::bail;
use crate::error::{ErrorKind, WalmetricsResult};

/// Validates a table or column name against the identifier allow-list: one or
/// more ASCII letters, digits, or underscores, and nothing else.
///
/// Every identifier must pass this check before it is interpolated into a
/// statement string. Values travel as bound parameters, but identifiers are
/// not parameterizable in SQL, so this allow-list is the sole injection
/// defense for them.
pub fn check_entity_name(entity_name: &str) -> WalmetricsResult<()> {
    let valid = !entity_name.is_empty()
        && entity_name
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_');

    if !valid {
        bail!(
            ErrorKind::InvalidEntityName,
            "invalid SQL entity name",
            format!("identifier {entity_name:?} contains characters outside [A-Za-z0-9_]")
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_name_passes() {
        check_entity_name("common_metrics").unwrap();
        check_entity_name("Table01").unwrap();
        check_entity_name("_leading").unwrap();
    }

    #[test]
    fn double_quote_is_rejected() {
        let err = check_entity_name("common_\"metrics").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEntityName);
    }

    #[test]
    fn space_is_rejected() {
        let err = check_entity_name("common metrics").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEntityName);
    }

    #[test]
    fn backslash_is_rejected() {
        let err = check_entity_name("common\\metrics").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEntityName);
    }

    #[test]
    fn empty_and_non_ascii_names_are_rejected() {
        assert!(check_entity_name("").is_err());
        assert!(check_entity_name("métrics").is_err());
        assert!(check_entity_name("a;drop table b").is_err());
    }
}
