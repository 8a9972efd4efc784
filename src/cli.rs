use pico_args::Arguments;

/// Parsed command-line options
pub struct Args {
    pub config: Option<String>,
    pub server: Option<String>,
    pub log_level: String,
    pub ipv6: bool,
    pub hostnames: Vec<String>,
}

pub fn print_help() {
    println!("stubdns {}\n", env!("CARGO_PKG_VERSION"));
    println!("Usage: stubdns [OPTIONS] <hostname>...\n");
    println!("OPTIONS:");
    println!("  -c, --config <file>       Configuration file path");
    println!("  -s, --server <addr:port>  Upstream DNS server (default: 127.0.0.1:53)");
    println!(
        "  -l, --log-level <level>   Log level (trace, debug, info, warn, error) (default: info)"
    );
    println!("  -6, --ipv6                Query AAAA records instead of A records");
    println!("  -h, --help                Print this help message");
}

/// Parse CLI arguments using `pico-args` from the current process args.
/// Returns `None` if help was printed and the caller should exit gracefully.
pub fn parse_args() -> Option<Args> {
    let raw_args: Vec<String> = std::env::args().collect();
    parse_args_from_vec(raw_args)
}

/// Helper variant that accepts an explicit `Vec<String>` for easier testing.
pub fn parse_args_from_vec(raw_args: Vec<String>) -> Option<Args> {
    if raw_args.len() <= 1 {
        print_help();
        return None;
    }

    let os_args: Vec<std::ffi::OsString> =
        raw_args.into_iter().skip(1).map(std::ffi::OsString::from).collect();
    let mut pargs = Arguments::from_vec(os_args);
    if pargs.contains(["-h", "--help"]) {
        print_help();
        return None;
    }

    let config = match pargs.opt_value_from_str(["-c", "--config"]) {
        Ok(Some(s)) => Some(s),
        _ => None,
    };

    let server = match pargs.opt_value_from_str(["-s", "--server"]) {
        Ok(Some(s)) => Some(s),
        _ => None,
    };

    let log_level = match pargs.opt_value_from_str(["-l", "--log-level"]) {
        Ok(Some(s)) => s,
        _ => "info".to_string(),
    };

    let ipv6 = pargs.contains(["-6", "--ipv6"]);

    // Remaining free arguments are the hostnames to resolve.
    let hostnames: Vec<String> = pargs
        .finish()
        .into_iter()
        .map(|s| s.to_string_lossy().into_owned())
        .collect();
    if hostnames.is_empty() {
        print_help();
        return None;
    }

    Some(Args {
        config,
        server,
        log_level,
        ipv6,
        hostnames,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_none_and_prints_help_with_no_args() {
        let args = vec!["stubdns".to_string()];
        let res = parse_args_from_vec(args);
        assert!(res.is_none());
    }

    #[test]
    fn returns_none_on_help_flag() {
        let args = vec!["stubdns".to_string(), "--help".to_string()];
        let res = parse_args_from_vec(args);
        assert!(res.is_none());
    }

    #[test]
    fn returns_none_without_hostnames() {
        let args = vec![
            "stubdns".to_string(),
            "-s".to_string(),
            "1.1.1.1:53".to_string(),
        ];
        let res = parse_args_from_vec(args);
        assert!(res.is_none());
    }

    #[test]
    fn parses_all_options() {
        let args = vec![
            "stubdns".to_string(),
            "-c".to_string(),
            "myconf.yaml".to_string(),
            "-s".to_string(),
            "9.9.9.9:53".to_string(),
            "-l".to_string(),
            "debug".to_string(),
            "-6".to_string(),
            "example.com".to_string(),
            "example.org".to_string(),
        ];

        let res = parse_args_from_vec(args).expect("should parse args");
        assert_eq!(res.config.as_deref(), Some("myconf.yaml"));
        assert_eq!(res.server.as_deref(), Some("9.9.9.9:53"));
        assert_eq!(res.log_level, "debug");
        assert!(res.ipv6);
        assert_eq!(res.hostnames, vec!["example.com", "example.org"]);
    }

    #[test]
    fn uses_defaults_when_options_missing() {
        let args = vec!["stubdns".to_string(), "example.com".to_string()];
        let res = parse_args_from_vec(args).expect("should parse");
        assert!(res.config.is_none());
        assert!(res.server.is_none());
        assert_eq!(res.log_level, "info");
        assert!(!res.ipv6);
        assert_eq!(res.hostnames, vec!["example.com"]);
    }
}
