use super::*;
use crate::output::OutputLocation;
use crate::tool_model::{RunParameters, ToolCategory, ToolSpec};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn location(dir: &str, name: &str) -> OutputLocation {
    let directory = PathBuf::from(dir);
    let full_path = directory.join(format!("{}.txt", name));
    OutputLocation {
        directory,
        filename: name.to_string(),
        full_path,
    }
}

fn echo_template(p: &RunParameters, out: &OutputLocation) -> CommandLine {
    CommandLine::new("echo").arg(p.target.as_str()).arg("-o").path_arg(&out.full_path)
}

fn spec(supports_output_flag: bool, append_output: bool) -> ToolSpec {
    ToolSpec {
        name: "echo",
        label: "Echo",
        category: ToolCategory::Network,
        binary: "echo",
        inputs: &[],
        default_wordlist: None,
        supports_output_flag,
        append_output,
        template: echo_template,
    }
}

#[test]
fn test_render_plain_words() {
    let cmd = CommandLine::new("gobuster")
        .args(["dir", "-w", "/usr/share/wordlists/common.txt"]);
    assert_eq!(cmd.render(), "gobuster dir -w /usr/share/wordlists/common.txt");
    assert_eq!(cmd.program(), Some("gobuster"));
}

#[test]
fn test_render_quotes_hostile_input() {
    let cmd = CommandLine::new("nmap").arg("x; rm -rf ~");
    assert_eq!(cmd.render(), "nmap 'x; rm -rf ~'");

    let cmd = CommandLine::new("whois").arg("$(id)");
    assert_eq!(cmd.render(), "whois '$(id)'");
}

#[test]
fn test_render_roundtrips_through_shell_split() {
    let cmd = CommandLine::new("ffuf")
        .arg("-H")
        .arg("Host: FUZZ.example.com")
        .arg("it's");
    let split = shell_words::split(&cmd.render()).unwrap();
    assert_eq!(split, vec!["ffuf", "-H", "Host: FUZZ.example.com", "it's"]);
    assert_eq!(cmd.words(), vec!["ffuf", "-H", "Host: FUZZ.example.com", "it's"]);
}

#[test]
fn test_and_then_and_append() {
    let out = PathBuf::from("/tmp/out/john_x.txt");
    let cmd = CommandLine::new("john")
        .arg("hashes")
        .and_then(CommandLine::new("john").arg("--show").append_stdout_to(&out));
    assert_eq!(cmd.render(), "john hashes && john --show >> /tmp/out/john_x.txt");
}

#[test]
fn test_tee_groups_whole_command() {
    let out = PathBuf::from("/tmp/out/nmap_x.txt");
    let cmd = CommandLine::new("nmap").arg("-F").tee_into(&out, false);
    assert_eq!(cmd.render(), "{ nmap -F; } 2>&1 | tee /tmp/out/nmap_x.txt");

    let cmd = CommandLine::new("nmap").tee_into(&out, true);
    assert!(cmd.render().ends_with("| tee -a /tmp/out/nmap_x.txt"));
}

#[test]
fn test_pause_tail_blocks_on_read() {
    let cmd = CommandLine::new("dirb").then_pause("Press enter to return to menu...");
    let rendered = cmd.render();
    assert!(rendered.starts_with("dirb; printf "));
    assert!(rendered.contains("'Press enter to return to menu...'"));
    assert!(rendered.ends_with("; read -r _"));
}

#[test]
fn test_build_with_output_flag_skips_tee() {
    let builder = CommandBuilder::default();
    let out = location("/tmp/scan", "echo_output");
    let cmd = builder.build(&spec(true, false), &RunParameters::new("10.0.0.1"), &out);

    let rendered = cmd.render();
    assert!(rendered.starts_with("echo 10.0.0.1 -o /tmp/scan/echo_output.txt;"));
    assert!(!rendered.contains("tee"));
    assert!(rendered.ends_with("read -r _"));
}

#[test]
fn test_build_without_output_flag_uses_tee() {
    let builder = CommandBuilder::new("bye");
    let out = location("/tmp/scan", "echo_output");
    let cmd = builder.build(&spec(false, false), &RunParameters::new("10.0.0.1"), &out);

    let expected = format!(
        "{{ echo 10.0.0.1 -o /tmp/scan/echo_output.txt; }} 2>&1 | tee /tmp/scan/echo_output.txt; printf {} bye; read -r _",
        shell_words::quote("%s")
    );
    assert_eq!(cmd.render(), expected);
}

#[test]
fn test_build_appends_when_requested() {
    let builder = CommandBuilder::default();
    let out = location("/tmp/scan", "echo_output");
    let cmd = builder.build(&spec(false, true), &RunParameters::new("h"), &out);
    assert!(cmd.render().contains("| tee -a /tmp/scan/echo_output.txt;"));
}

#[test]
fn test_build_is_pure() {
    let builder = CommandBuilder::default();
    let out = location("/nonexistent/never/created", "x");
    let params = RunParameters::new("example.com");

    let first = builder.build(&spec(false, false), &params, &out);
    let second = builder.build(&spec(false, false), &params, &out);

    assert_eq!(first, second);
    assert!(!out.directory.exists());
}
