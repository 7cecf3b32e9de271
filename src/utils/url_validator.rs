//! URL 解析与域名提取
//!
//! The domain label is a lossy canonicalization kept for compatibility with
//! existing ledgers: every `www.` and `.com` is removed from the hostname,
//! wherever it appears. `www.mail.google.com` becomes `mail.google` and
//! `bbc.co.uk` stays `bbc.co.uk`.
//!
//! The hostname is the one `url::Url` reports, so it is already lowercased,
//! IDNA-encoded and, for IPv4, normalized: `HTTPS://WWW.GOOGLE.COM` gives
//! `google` and `http://0x7f.1/` gives `127.0.0.1`.

use url::Url;

/// URL 验证错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidFormat(String),
    InvalidEscape(String),
    InvalidUserinfo,
    ControlCharacter,
    InvalidHostCharacter(String),
    MissingHost,
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
            Self::InvalidEscape(seq) => write!(f, "invalid URL escape {:?}", seq),
            Self::InvalidUserinfo => write!(f, "invalid userinfo"),
            Self::ControlCharacter => write!(f, "invalid control character in URL"),
            Self::InvalidHostCharacter(seq) => write!(f, "invalid character {:?} in host name", seq),
            Self::MissingHost => write!(f, "URL has no host"),
        }
    }
}

impl std::error::Error for UrlValidationError {}

const WWW_PREFIX: &str = "www.";
const COM_SUFFIX: &str = ".com";

/// Parse `input` and return its hostname
///
/// Stricter than `Url::parse` alone. These are rejected instead of being
/// re-encoded or guessed at:
/// - malformed percent escapes outside the query, and control characters
/// - userinfo characters outside RFC 3986's unreserved / sub-delims set
/// - host characters other than those plus `:[]<>"`, and `%XX` ASCII escapes
///   in the host (`%25` is kept for IPv6 zones)
/// - a scheme not followed by `//`: `https:example.com` has no host
pub fn parse_hostname(input: &str) -> Result<String, UrlValidationError> {
    if input.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }
    if input.chars().any(|c| c.is_ascii_control()) {
        return Err(UrlValidationError::ControlCharacter);
    }

    check_escapes(input)?;
    check_authority(input)?;

    let parsed = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;
    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(UrlValidationError::MissingHost)?;

    // IPv6 字面量去掉方括号
    Ok(host.trim_start_matches('[').trim_end_matches(']').to_string())
}

/// Domain label for a URL: hostname with every `www.` and `.com` removed
pub fn extract_domain(input: &str) -> Result<String, UrlValidationError> {
    let host = parse_hostname(input)?;
    Ok(strip_domain_noise(&host))
}

/// One left-to-right pass; text produced by a removal is not rescanned
/// against earlier output, so `www.com` yields `com`.
fn strip_domain_noise(host: &str) -> String {
    let mut out = String::with_capacity(host.len());
    let mut rest = host;
    loop {
        if let Some(after) = rest
            .strip_prefix(WWW_PREFIX)
            .or_else(|| rest.strip_prefix(COM_SUFFIX))
        {
            rest = after;
            continue;
        }
        let mut chars = rest.chars();
        match chars.next() {
            Some(ch) => {
                out.push(ch);
                rest = chars.as_str();
            }
            None => break,
        }
    }
    out
}

/// Every `%` outside the query must start a two-hex-digit escape
fn check_escapes(input: &str) -> Result<(), UrlValidationError> {
    let (before_fragment, fragment) = match input.split_once('#') {
        Some((head, frag)) => (head, Some(frag)),
        None => (input, None),
    };
    let without_query = before_fragment
        .split_once('?')
        .map_or(before_fragment, |(head, _query)| head);

    for part in std::iter::once(without_query).chain(fragment) {
        let bytes = part.as_bytes();
        for (i, _) in part.match_indices('%') {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                let end = part.len().min(i + 3);
                let seq = part.get(i..end).unwrap_or("%").to_string();
                return Err(UrlValidationError::InvalidEscape(seq));
            }
        }
    }
    Ok(())
}

/// `scheme:` prefix split off, if `input` starts with a syntactically valid scheme
fn split_scheme(input: &str) -> Option<&str> {
    let (scheme, rest) = input.split_once(':')?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(rest)
}

fn is_unreserved_or_sub_delim(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '-' | '.' | '_' | '~' | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '='
        )
}

/// Raw authority checks, done before `Url::parse` can normalize anything
fn check_authority(input: &str) -> Result<(), UrlValidationError> {
    // 没有合法 scheme 的输入交给 Url::parse 报错
    let Some(rest) = split_scheme(input) else {
        return Ok(());
    };
    let Some(after_slashes) = rest.strip_prefix("//") else {
        return Err(UrlValidationError::MissingHost);
    };
    let authority_end = after_slashes
        .find(['/', '?', '#'])
        .unwrap_or(after_slashes.len());
    let authority = &after_slashes[..authority_end];

    let host = match authority.rfind('@') {
        Some(at) => {
            let userinfo_ok = authority[..at]
                .chars()
                .all(|c| is_unreserved_or_sub_delim(c) || matches!(c, ':' | '%' | '@'));
            if !userinfo_ok {
                return Err(UrlValidationError::InvalidUserinfo);
            }
            &authority[at + 1..]
        }
        None => authority,
    };
    // `https:///x` 会被 Url::parse 补出 host "x"
    if host.is_empty() || host.starts_with(':') {
        return Err(UrlValidationError::MissingHost);
    }
    check_host(host)
}

fn check_host(host: &str) -> Result<(), UrlValidationError> {
    let bytes = host.as_bytes();
    for (i, c) in host.char_indices() {
        if c == '%' {
            // check_escapes 已保证后面有两位十六进制
            let seq = host.get(i..i + 3).unwrap_or("%");
            let ascii_escape = bytes.get(i + 1).is_some_and(|b| *b < b'8');
            if ascii_escape && seq != "%25" {
                return Err(UrlValidationError::InvalidEscape(seq.to_string()));
            }
            continue;
        }
        let allowed = !c.is_ascii()
            || is_unreserved_or_sub_delim(c)
            || matches!(c, ':' | '[' | ']' | '<' | '>' | '"');
        if !allowed {
            return Err(UrlValidationError::InvalidHostCharacter(c.to_string()));
        }
    }
    Ok(())
}
