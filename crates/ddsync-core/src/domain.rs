//! Fully-qualified domain splitting
//!
//! The provider's record model addresses a record by (host label, zone)
//! rather than by FQDN. The zone is always the last two labels; the host is
//! `@` for an apex domain, otherwise the remaining leading labels.

use crate::error::{Error, Result};

/// A fully-qualified domain split into the provider's (host, zone) form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitDomain {
    /// Host label(s), `@` for the zone apex
    pub host: String,
    /// Registrable zone (last two labels)
    pub zone: String,
}

/// Split a fully-qualified domain into (host, zone)
///
/// Empty labels are discarded before counting, so a trailing dot is
/// harmless. Fewer than two non-empty labels is an error for that domain
/// only; callers skip the domain and continue.
///
/// ```
/// use ddsync_core::domain::split_domain;
///
/// let split = split_domain("home.example.com").unwrap();
/// assert_eq!(split.host, "home");
/// assert_eq!(split.zone, "example.com");
///
/// let apex = split_domain("example.com").unwrap();
/// assert_eq!(apex.host, "@");
/// ```
pub fn split_domain(fqdn: &str) -> Result<SplitDomain> {
    let labels: Vec<&str> = fqdn.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() < 2 {
        return Err(Error::invalid_domain(format!(
            "expected at least two labels, got {:?}",
            fqdn
        )));
    }

    let zone = labels[labels.len() - 2..].join(".");
    let host = if labels.len() == 2 {
        "@".to_string()
    } else {
        labels[..labels.len() - 2].join(".")
    };

    Ok(SplitDomain { host, zone })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_subdomain() {
        let split = split_domain("home.example.com").unwrap();
        assert_eq!(split.host, "home");
        assert_eq!(split.zone, "example.com");
    }

    #[test]
    fn splits_nested_subdomain() {
        let split = split_domain("a.b.example.com").unwrap();
        assert_eq!(split.host, "a.b");
        assert_eq!(split.zone, "example.com");
    }

    #[test]
    fn apex_maps_to_at() {
        let split = split_domain("example.com").unwrap();
        assert_eq!(split.host, "@");
        assert_eq!(split.zone, "example.com");
    }

    #[test]
    fn trailing_dot_is_discarded() {
        let split = split_domain("home.example.com.").unwrap();
        assert_eq!(split.host, "home");
        assert_eq!(split.zone, "example.com");
    }

    #[test]
    fn single_label_is_invalid() {
        assert!(matches!(
            split_domain("x"),
            Err(Error::InvalidDomain(_))
        ));
    }

    #[test]
    fn empty_and_dots_only_are_invalid() {
        assert!(split_domain("").is_err());
        assert!(split_domain("...").is_err());
        assert!(split_domain(".com").is_err());
    }
}
