use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

static HOST_REGEX: OnceLock<Regex> = OnceLock::new();
static HASHCAT_MODE_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_host_regex() -> &'static Regex {
    HOST_REGEX.get_or_init(|| Regex::new(r"^[a-zA-Z0-9\.\-_]+$").unwrap())
}

fn get_hashcat_mode_regex() -> &'static Regex {
    HASHCAT_MODE_REGEX.get_or_init(|| Regex::new(r"^[0-9]{1,5}$").unwrap())
}

fn check_common(value: &str, what: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} cannot be empty", what));
    }
    if value.starts_with('-') {
        return Err(format!("{} cannot start with a hyphen", what));
    }
    if value.len() > 255 {
        return Err(format!("{} is too long", what));
    }
    Ok(())
}

/// Hostname, domain or IP address. No scheme, no path.
pub fn validate_host(host: &str) -> Result<(), String> {
    check_common(host, "Target")?;

    if host.contains("://") {
        return Err("Enter the host without a scheme (e.g. example.com, not http://example.com)".to_string());
    }

    if get_host_regex().is_match(host) {
        return Ok(());
    }

    Err("Invalid target format. Must be an IP address or a domain.".to_string())
}

/// Host, or CIDR range for tools that sweep networks.
pub fn validate_target(target: &str) -> Result<(), String> {
    check_common(target, "Target")?;

    if target.contains('/') && !target.contains("://") {
        let parts: Vec<&str> = target.split('/').collect();
        if parts.len() != 2 {
            return Err("Invalid CIDR format".to_string());
        }
        if !get_host_regex().is_match(parts[0]) {
            return Err("Invalid IP in CIDR".to_string());
        }
        match parts[1].parse::<u8>() {
            Ok(mask) if mask <= 32 => return Ok(()),
            _ => return Err("Invalid mask in CIDR".to_string()),
        }
    }

    validate_host(target)
}

pub fn validate_port(port: &str) -> Result<(), String> {
    match port.trim().parse::<u16>() {
        Ok(0) | Err(_) => Err(format!("Invalid port '{}'. Use 1-65535.", port.trim())),
        Ok(_) => Ok(()),
    }
}

/// Operator-supplied wordlists must exist. Built-in defaults are not checked.
pub fn validate_wordlist(path: &str) -> Result<(), String> {
    if path.trim().is_empty() {
        return Err("Wordlist path cannot be empty".to_string());
    }
    if !Path::new(path).is_file() {
        return Err(format!("Wordlist not found: {}", path));
    }
    Ok(())
}

pub fn validate_hash(hash: &str) -> Result<(), String> {
    if hash.trim().is_empty() {
        return Err("Hash cannot be empty".to_string());
    }
    if hash.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err("Hash cannot contain whitespace".to_string());
    }
    Ok(())
}

pub fn validate_hash_file(path: &str) -> Result<(), String> {
    if path.trim().is_empty() {
        return Err("Hash file path cannot be empty".to_string());
    }
    if !Path::new(path).is_file() {
        return Err(format!("Hash file not found: {}", path));
    }
    Ok(())
}

pub fn validate_hashcat_mode(mode: &str) -> Result<(), String> {
    if get_hashcat_mode_regex().is_match(mode.trim()) {
        Ok(())
    } else {
        Err(format!("Invalid hashcat mode '{}'. Expected a number such as 0 (MD5).", mode))
    }
}

/// Optional numeric response filter (ffuf -fs / -fw). Empty means unset.
pub fn validate_filter(value: &str) -> Result<(), String> {
    let value = value.trim();
    if value.is_empty() || value.split(',').all(|v| !v.is_empty() && v.chars().all(|c| c.is_ascii_digit())) {
        Ok(())
    } else {
        Err(format!("Invalid filter '{}'. Use numbers, comma separated.", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("10.10.10.10")]
    #[case("example.com")]
    #[case("sub-domain.example.co.uk")]
    #[case("localhost")]
    fn test_valid_hosts(#[case] host: &str) {
        assert!(validate_host(host).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("-oN")]
    #[case("http://example.com")]
    #[case("host; rm -rf ~")]
    #[case("a$(id)")]
    #[case("10.0.0.0/24")]
    fn test_invalid_hosts(#[case] host: &str) {
        assert!(validate_host(host).is_err());
    }

    #[test]
    fn test_target_accepts_cidr() {
        assert!(validate_target("192.168.1.0/24").is_ok());
        assert!(validate_target("192.168.1.0/33").is_err());
        assert!(validate_target("192.168.1.0/24/1").is_err());
        assert!(validate_target("example.com").is_ok());
    }

    #[test]
    fn test_port() {
        assert!(validate_port("80").is_ok());
        assert!(validate_port(" 8080 ").is_ok());
        assert!(validate_port("0").is_err());
        assert!(validate_port("70000").is_err());
        assert!(validate_port("http").is_err());
    }

    #[test]
    fn test_wordlist_must_exist() {
        assert!(validate_wordlist("/dev/null").is_err()); // not a regular file
        assert!(validate_wordlist("/definitely/not/here.txt").is_err());
        assert!(validate_wordlist("Cargo.toml").is_ok());
    }

    #[test]
    fn test_hash_and_mode() {
        assert!(validate_hash("5f4dcc3b5aa765d61d8327deb882cf99").is_ok());
        assert!(validate_hash("$2y$10$abc/def").is_ok());
        assert!(validate_hash("abc def").is_err());
        assert!(validate_hashcat_mode("0").is_ok());
        assert!(validate_hashcat_mode("1800").is_ok());
        assert!(validate_hashcat_mode("md5").is_err());
    }

    #[test]
    fn test_filter() {
        assert!(validate_filter("").is_ok());
        assert!(validate_filter("4242").is_ok());
        assert!(validate_filter("12,40").is_ok());
        assert!(validate_filter("12;id").is_err());
    }
}
