//! Domain normalization for brand lookups.
//!
//! Accepts whatever the user typed (`Uniqlo.com`, `https://www.uniqlo.com/us/en/`,
//! `uniqlo`) and reduces it to the key the brand provider is queried with.

use url::Url;

const WWW_PREFIX: &str = "www.";

/// Upper bound on re-normalization passes. Each pass that changes its input
/// either decodes an escape, drops a `www.` label or canonicalizes the host,
/// so real inputs settle in one or two.
const MAX_PASSES: usize = 8;

/// Normalize a raw domain or URL string.
///
/// Inputs containing `://` or a `.` are parsed as URLs (`https://` is assumed
/// when no scheme is given) and reduced to their lowercase host with every
/// leading `www.` label removed. Hosts from non-web schemes are re-read as
/// `https` hosts, so percent-escapes and IP forms end up canonical. Anything
/// else, or anything that fails to parse, is returned trimmed. The result is
/// a fixed point: `normalize_domain(&normalize_domain(s)) == normalize_domain(s)`.
pub fn normalize_domain(raw: &str) -> String {
    let mut current = normalize_once(raw);
    for _ in 0..MAX_PASSES {
        let next = normalize_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn normalize_once(raw: &str) -> String {
    let trimmed = raw.trim();

    if !(trimmed.contains("://") || trimmed.contains('.')) {
        return trimmed.to_string();
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    match Url::parse(&candidate)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
    {
        Some(host) => strip_www(&canonical_host(&host)).to_string(),
        None => trimmed.to_string(),
    }
}

/// The host as an `https` URL would hold it. Opaque hosts that are not valid
/// domains are only lowercased.
fn canonical_host(host: &str) -> String {
    Url::parse(&format!("https://{host}"))
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| host.to_ascii_lowercase())
}

fn strip_www(host: &str) -> &str {
    let mut host = host;
    while let Some(rest) = host.strip_prefix(WWW_PREFIX) {
        host = rest;
    }
    host
}
