use crate::command::CommandLine;
use crate::output::OutputLocation;
use crate::tool_model::{
    RunParameters, ScanMode, ToolCategory, ToolInput, ToolSpec, FLAG_FILTER_SIZE,
    FLAG_FILTER_WORDS, FLAG_HASH_MODE,
};

pub const DIRBUSTER_MEDIUM: &str = "/usr/share/wordlists/dirbuster/directory-list-2.3-medium.txt";
pub const DIRB_COMMON: &str = "/usr/share/wordlists/dirb/common.txt";
pub const SUBDOMAINS_TOP: &str = "/usr/share/seclists/Discovery/DNS/subdomains-top1million-110000.txt";
pub const ROCKYOU: &str = "/usr/share/wordlists/rockyou.txt";

const WEB_INPUTS: &[ToolInput] = &[ToolInput::Target, ToolInput::Port, ToolInput::Wordlist];
const VHOST_INPUTS: &[ToolInput] = &[
    ToolInput::Target,
    ToolInput::Port,
    ToolInput::Wordlist,
    ToolInput::Filters,
];
const DOMAIN_INPUTS: &[ToolInput] = &[ToolInput::Domain];
const DNS_BRUTE_INPUTS: &[ToolInput] = &[ToolInput::Domain, ToolInput::Wordlist];
const SCAN_INPUTS: &[ToolInput] = &[ToolInput::Target, ToolInput::ScanMode];
const RANGE_INPUTS: &[ToolInput] = &[ToolInput::Network, ToolInput::ScanMode];
const LOCALNET_INPUTS: &[ToolInput] = &[ToolInput::ScanMode];
const WHOIS_INPUTS: &[ToolInput] = &[ToolInput::Domain, ToolInput::ScanMode];

/// Deep whois: print the registry answer, then follow its referral server.
/// The target arrives as `$1`, never spliced into the script.
pub const WHOIS_REFERRAL_SCRIPT: &str = r#"out=$(whois "$1"); printf '%s\n' "$out"; server=$(printf '%s\n' "$out" | grep -E 'Whois Server:|WHOIS Server:' | head -n 1 | cut -d: -f2- | tr -d ' \r'); if [ -n "$server" ]; then printf '\n'; whois -h "$server" "$1"; fi"#;
const HASHCAT_INPUTS: &[ToolInput] = &[ToolInput::HashSource, ToolInput::Wordlist, ToolInput::HashMode];
const JOHN_INPUTS: &[ToolInput] = &[ToolInput::HashSource, ToolInput::Wordlist];

/// Every tool the launcher knows. Names are unique.
pub static TOOLS: &[ToolSpec] = &[
    // Subdomain enumeration
    ToolSpec {
        name: "ffuf-vhost",
        label: "ffuf (virtual host fuzzing)",
        category: ToolCategory::Subdomain,
        binary: "ffuf",
        inputs: VHOST_INPUTS,
        default_wordlist: Some(SUBDOMAINS_TOP),
        supports_output_flag: false,
        append_output: false,
        template: ffuf_vhost,
    },
    ToolSpec {
        name: "sublist3r",
        label: "Sublist3r",
        category: ToolCategory::Subdomain,
        binary: "sublist3r",
        inputs: DOMAIN_INPUTS,
        default_wordlist: None,
        supports_output_flag: true,
        append_output: false,
        template: sublist3r,
    },
    ToolSpec {
        name: "subfinder",
        label: "Subfinder",
        category: ToolCategory::Subdomain,
        binary: "subfinder",
        inputs: DOMAIN_INPUTS,
        default_wordlist: None,
        supports_output_flag: true,
        append_output: false,
        template: subfinder,
    },
    ToolSpec {
        name: "gobuster-dns",
        label: "Gobuster (dns mode)",
        category: ToolCategory::Subdomain,
        binary: "gobuster",
        inputs: DNS_BRUTE_INPUTS,
        default_wordlist: Some(SUBDOMAINS_TOP),
        supports_output_flag: true,
        append_output: false,
        template: gobuster_dns,
    },
    // Network mapping
    ToolSpec {
        name: "nmap",
        label: "Nmap",
        category: ToolCategory::Network,
        binary: "nmap",
        inputs: SCAN_INPUTS,
        default_wordlist: None,
        supports_output_flag: false,
        append_output: false,
        template: nmap,
    },
    ToolSpec {
        name: "traceroute",
        label: "Traceroute",
        category: ToolCategory::Network,
        binary: "traceroute",
        inputs: SCAN_INPUTS,
        default_wordlist: None,
        supports_output_flag: false,
        append_output: false,
        template: traceroute,
    },
    ToolSpec {
        name: "whois",
        label: "Whois",
        category: ToolCategory::Network,
        binary: "whois",
        inputs: WHOIS_INPUTS,
        default_wordlist: None,
        supports_output_flag: false,
        append_output: false,
        template: whois,
    },
    ToolSpec {
        name: "hping3",
        label: "hping3 (SYN probe, root)",
        category: ToolCategory::Network,
        binary: "hping3",
        inputs: SCAN_INPUTS,
        default_wordlist: None,
        supports_output_flag: false,
        append_output: false,
        template: hping3,
    },
    ToolSpec {
        name: "dnsrecon",
        label: "DNSRecon",
        category: ToolCategory::Network,
        binary: "dnsrecon",
        inputs: &[ToolInput::Domain, ToolInput::ScanMode],
        default_wordlist: None,
        supports_output_flag: false,
        append_output: false,
        template: dnsrecon,
    },
    ToolSpec {
        name: "arp-scan",
        label: "ARP Scan (local network, sudo)",
        category: ToolCategory::Network,
        binary: "arp-scan",
        inputs: LOCALNET_INPUTS,
        default_wordlist: None,
        supports_output_flag: false,
        append_output: false,
        template: arp_scan,
    },
    ToolSpec {
        name: "netdiscover",
        label: "Netdiscover",
        category: ToolCategory::Network,
        binary: "netdiscover",
        inputs: RANGE_INPUTS,
        default_wordlist: None,
        supports_output_flag: false,
        append_output: false,
        template: netdiscover,
    },
    ToolSpec {
        name: "tshark",
        label: "TShark (host capture)",
        category: ToolCategory::Network,
        binary: "tshark",
        inputs: SCAN_INPUTS,
        default_wordlist: None,
        supports_output_flag: false,
        append_output: false,
        template: tshark,
    },
    ToolSpec {
        name: "sslscan",
        label: "SSLScan",
        category: ToolCategory::Network,
        binary: "sslscan",
        inputs: SCAN_INPUTS,
        default_wordlist: None,
        supports_output_flag: false,
        append_output: false,
        template: sslscan,
    },
    ToolSpec {
        name: "snmpwalk",
        label: "SNMPWalk",
        category: ToolCategory::Network,
        binary: "snmpwalk",
        inputs: SCAN_INPUTS,
        default_wordlist: None,
        supports_output_flag: false,
        append_output: false,
        template: snmpwalk,
    },
    // Directory traversal
    ToolSpec {
        name: "gobuster",
        label: "Gobuster",
        category: ToolCategory::Directory,
        binary: "gobuster",
        inputs: WEB_INPUTS,
        default_wordlist: Some(DIRBUSTER_MEDIUM),
        supports_output_flag: true,
        append_output: false,
        template: gobuster_dir,
    },
    ToolSpec {
        name: "ffuf",
        label: "ffuf",
        category: ToolCategory::Directory,
        binary: "ffuf",
        inputs: WEB_INPUTS,
        default_wordlist: Some(DIRBUSTER_MEDIUM),
        supports_output_flag: true,
        append_output: false,
        template: ffuf_dir,
    },
    ToolSpec {
        name: "feroxbuster",
        label: "Feroxbuster",
        category: ToolCategory::Directory,
        binary: "feroxbuster",
        inputs: WEB_INPUTS,
        default_wordlist: Some(DIRBUSTER_MEDIUM),
        supports_output_flag: true,
        append_output: false,
        template: feroxbuster,
    },
    ToolSpec {
        name: "dirb",
        label: "dirb",
        category: ToolCategory::Directory,
        binary: "dirb",
        inputs: WEB_INPUTS,
        default_wordlist: Some(DIRB_COMMON),
        supports_output_flag: true,
        append_output: false,
        template: dirb,
    },
    // Hash cracking
    ToolSpec {
        name: "hash-identifier",
        label: "hash-identifier (interactive)",
        category: ToolCategory::Hash,
        binary: "hash-identifier",
        inputs: &[],
        default_wordlist: None,
        supports_output_flag: false,
        append_output: false,
        template: hash_identifier,
    },
    ToolSpec {
        name: "hashcat",
        label: "Hashcat",
        category: ToolCategory::Hash,
        binary: "hashcat",
        inputs: HASHCAT_INPUTS,
        default_wordlist: Some(ROCKYOU),
        supports_output_flag: false,
        append_output: true,
        template: hashcat,
    },
    ToolSpec {
        name: "john",
        label: "John the Ripper",
        category: ToolCategory::Hash,
        binary: "john",
        inputs: JOHN_INPUTS,
        default_wordlist: Some(ROCKYOU),
        supports_output_flag: false,
        append_output: true,
        template: john,
    },
];

pub fn find(name: &str) -> Option<&'static ToolSpec> {
    TOOLS.iter().find(|t| t.name == name)
}

pub fn by_category(category: ToolCategory) -> Vec<&'static ToolSpec> {
    TOOLS.iter().filter(|t| t.category == category).collect()
}

/// Identifier used when a tool takes no target, so output still gets a name.
pub fn implicit_identifier(tool: &ToolSpec) -> Option<&'static str> {
    match tool.name {
        "hash-identifier" => Some("identifier"),
        "arp-scan" => Some("localnet"),
        _ => None,
    }
}

fn http_base(params: &RunParameters) -> String {
    format!("http://{}:{}", params.target, params.port_or_default())
}

fn deep(params: &RunParameters) -> bool {
    params.mode() == ScanMode::Deep
}

// --- Directory traversal ---

fn gobuster_dir(p: &RunParameters, out: &OutputLocation) -> CommandLine {
    CommandLine::new("gobuster")
        .args(["dir", "-u"])
        .arg(http_base(p))
        .arg("-w")
        .arg(p.wordlist_or_empty())
        .arg("-o")
        .path_arg(&out.full_path)
}

fn ffuf_dir(p: &RunParameters, out: &OutputLocation) -> CommandLine {
    CommandLine::new("ffuf")
        .arg("-u")
        .arg(format!("{}/FUZZ", http_base(p)))
        .arg("-w")
        .arg(p.wordlist_or_empty())
        .arg("-o")
        .path_arg(&out.full_path)
        .args(["-of", "md"])
}

fn feroxbuster(p: &RunParameters, out: &OutputLocation) -> CommandLine {
    CommandLine::new("feroxbuster")
        .arg("-u")
        .arg(http_base(p))
        .arg("-w")
        .arg(p.wordlist_or_empty())
        .arg("-o")
        .path_arg(&out.full_path)
}

fn dirb(p: &RunParameters, out: &OutputLocation) -> CommandLine {
    CommandLine::new("dirb")
        .arg(http_base(p))
        .arg(p.wordlist_or_empty())
        .arg("-o")
        .path_arg(&out.full_path)
}

// --- Subdomain enumeration ---

fn ffuf_vhost(p: &RunParameters, _out: &OutputLocation) -> CommandLine {
    let cmd = CommandLine::new("ffuf")
        .arg("-w")
        .arg(p.wordlist_or_empty())
        .arg("-u")
        .arg(http_base(p))
        .arg("-H")
        .arg(format!("Host: FUZZ.{}", p.target));

    // Size filter wins when both are given.
    if let Some(size) = p.flag(FLAG_FILTER_SIZE) {
        cmd.arg("-fs").arg(size)
    } else if let Some(words) = p.flag(FLAG_FILTER_WORDS) {
        cmd.arg("-fw").arg(words)
    } else {
        cmd
    }
}

fn sublist3r(p: &RunParameters, out: &OutputLocation) -> CommandLine {
    CommandLine::new("sublist3r")
        .arg("-d")
        .arg(p.target.as_str())
        .arg("-o")
        .path_arg(&out.full_path)
}

fn subfinder(p: &RunParameters, out: &OutputLocation) -> CommandLine {
    CommandLine::new("subfinder")
        .arg("-d")
        .arg(p.target.as_str())
        .arg("-o")
        .path_arg(&out.full_path)
}

fn gobuster_dns(p: &RunParameters, out: &OutputLocation) -> CommandLine {
    CommandLine::new("gobuster")
        .args(["dns", "-d"])
        .arg(p.target.as_str())
        .arg("-w")
        .arg(p.wordlist_or_empty())
        .arg("-o")
        .path_arg(&out.full_path)
}

// --- Network mapping ---

fn nmap(p: &RunParameters, _out: &OutputLocation) -> CommandLine {
    if deep(p) {
        CommandLine::new("nmap")
            .arg(p.target.as_str())
            .args(["-sV", "-sC", "-A"])
    } else {
        CommandLine::new("nmap")
            .args(["-T4", "-F"])
            .arg(p.target.as_str())
    }
}

fn traceroute(p: &RunParameters, _out: &OutputLocation) -> CommandLine {
    let cmd = CommandLine::new("traceroute");
    if deep(p) {
        cmd.arg(p.target.as_str())
    } else {
        cmd.args(["-n", "-q", "1"]).arg(p.target.as_str())
    }
}

fn whois(p: &RunParameters, _out: &OutputLocation) -> CommandLine {
    if deep(p) {
        CommandLine::new("sh")
            .arg("-c")
            .arg(WHOIS_REFERRAL_SCRIPT)
            .arg("whois")
            .arg(p.target.as_str())
    } else {
        CommandLine::new("whois").arg(p.target.as_str())
    }
}

// Deep mode stays bounded: a fixed packet count at 10ms spacing, never --flood.
fn hping3(p: &RunParameters, _out: &OutputLocation) -> CommandLine {
    if deep(p) {
        CommandLine::new("hping3")
            .args(["-S", "-V", "-p", "1-65535", "-c", "1000", "-i", "u10000"])
            .arg(p.target.as_str())
    } else {
        CommandLine::new("hping3")
            .arg("-S")
            .arg(p.target.as_str())
            .args(["-p", "1-1024", "-c", "100"])
    }
}

fn dnsrecon(p: &RunParameters, _out: &OutputLocation) -> CommandLine {
    let cmd = CommandLine::new("dnsrecon").arg("-d").arg(p.target.as_str());
    if deep(p) {
        cmd.arg("-a")
    } else {
        cmd
    }
}

fn arp_scan(p: &RunParameters, _out: &OutputLocation) -> CommandLine {
    let cmd = CommandLine::new("sudo").arg("arp-scan");
    if deep(p) {
        cmd.args(["--localnet", "--retry", "3", "--verbose"])
    } else {
        cmd.arg("-l")
    }
}

fn netdiscover(p: &RunParameters, _out: &OutputLocation) -> CommandLine {
    let cmd = CommandLine::new("netdiscover").arg("-r").arg(p.target.as_str());
    if deep(p) {
        cmd.arg("-P")
    } else {
        cmd
    }
}

fn tshark(p: &RunParameters, out: &OutputLocation) -> CommandLine {
    let filter = format!("host {}", p.target);
    if deep(p) {
        CommandLine::new("tshark")
            .arg("-w")
            .path_arg(&out.directory.join("capture.pcap"))
            .arg("-f")
            .arg(filter)
    } else {
        CommandLine::new("tshark")
            .args(["-c", "100", "-f"])
            .arg(filter)
    }
}

fn sslscan(p: &RunParameters, _out: &OutputLocation) -> CommandLine {
    let endpoint = format!("{}:443", p.target);
    if deep(p) {
        CommandLine::new("sslscan").arg("--no-failed").arg(endpoint)
    } else {
        CommandLine::new("sslscan").arg(endpoint)
    }
}

fn snmpwalk(p: &RunParameters, _out: &OutputLocation) -> CommandLine {
    let version = if deep(p) { "-v2c" } else { "-v1" };
    CommandLine::new("snmpwalk")
        .arg(version)
        .args(["-c", "public"])
        .arg(p.target.as_str())
}

// --- Hash cracking ---

fn hash_identifier(_p: &RunParameters, _out: &OutputLocation) -> CommandLine {
    CommandLine::new("hash-identifier")
}

fn hashcat(p: &RunParameters, out: &OutputLocation) -> CommandLine {
    let mode = p.flag(FLAG_HASH_MODE).unwrap_or("0");
    let base = || {
        CommandLine::new("hashcat")
            .arg("-m")
            .arg(mode)
            .args(["-a", "0"])
            .arg(p.target.as_str())
            .arg(p.wordlist_or_empty())
    };

    base()
        .arg("-o")
        .path_arg(&out.full_path)
        .and_then(base().arg("--show").append_stdout_to(&out.full_path))
}

fn john(p: &RunParameters, out: &OutputLocation) -> CommandLine {
    let crack = CommandLine::new("john")
        .arg(format!("--wordlist={}", p.wordlist_or_empty()))
        .arg("--format=raw-md5")
        .arg(p.target.as_str());
    let show = CommandLine::new("john")
        .args(["--show", "--format=raw-md5"])
        .arg(p.target.as_str())
        .append_stdout_to(&out.full_path);

    crack.and_then(show)
}

#[cfg(test)]
#[path = "tools_tests.rs"]
mod tests;
