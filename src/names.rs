//! DNS-SD style name splitting.
//!
//! Mesh hosts register fully qualified names such as
//! `router1.default.service.arpa` and services such as
//! `myprinter._ipp._tcp.default.service.arpa.`. The publisher on the IP side
//! wants the pieces separately, and completions coming back from it only
//! carry the pieces, so the same split rules are used in both directions.
//!
//! Both functions scan for `.` only; escaped dots inside labels are not
//! recognized.

use crate::error::{Error, Result};

const SEPARATOR: char = '.';

/// A host name split into its first label and the remaining domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostName<'a> {
    pub instance: &'a str,
    pub domain: &'a str,
}

/// A service instance name split into instance, service type and domain.
///
/// The service type always spans exactly two labels (`_ipp._tcp`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceName<'a> {
    pub instance: &'a str,
    pub service_type: &'a str,
    pub domain: &'a str,
}

/// Splits a full host name on its first separator.
///
/// # Errors
///
/// Returns [`Error::Parse`] when the name contains no separator.
pub fn split_full_host_name(full_name: &str) -> Result<HostName<'_>> {
    let (instance, domain) = full_name
        .split_once(SEPARATOR)
        .ok_or_else(|| Error::Parse(full_name.to_owned()))?;

    Ok(HostName { instance, domain })
}

/// Splits a full service name on its first three separators.
///
/// `instance` is everything before the first separator, `service_type` the
/// two labels between the first and third separator, and `domain`
/// everything after the third separator (including a trailing root label).
///
/// # Errors
///
/// Returns [`Error::Parse`] when fewer than three separators are present.
pub fn split_full_service_name(full_name: &str) -> Result<ServiceName<'_>> {
    let parse_error = || Error::Parse(full_name.to_owned());

    let mut separators = full_name.match_indices(SEPARATOR).map(|(pos, _)| pos);

    let first = separators.next().ok_or_else(parse_error)?;
    let _second = separators.next().ok_or_else(parse_error)?;
    let third = separators.next().ok_or_else(parse_error)?;

    Ok(ServiceName {
        instance: &full_name[..first],
        service_type: &full_name[first + 1..third],
        domain: &full_name[third + 1..],
    })
}

/// Strips a single trailing root label from a service type.
///
/// Publishers are free to report `_ipp._tcp.` where `_ipp._tcp` was
/// registered.
pub fn normalize_service_type(service_type: &str) -> &str {
    service_type
        .strip_suffix(SEPARATOR)
        .unwrap_or(service_type)
}
