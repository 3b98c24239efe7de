//! NDEx v2 endpoint URL builders

/// Server root with a scheme and without a trailing slash.
///
/// Credentials files usually name the bare host (`public.ndexbio.org`).
pub fn normalize_server(server: &str) -> String {
    let server = server.trim().trim_end_matches('/');
    if server.starts_with("http://") || server.starts_with("https://") {
        server.to_string()
    } else {
        format!("http://{}", server)
    }
}

/// Build user lookup URL (username goes in the query string)
pub fn user_url(base_url: &str) -> String {
    format!("{}/v2/user", base_url)
}

/// Build network summary listing URL for a user
pub fn network_summary_url(base_url: &str, user_id: &str) -> String {
    format!("{}/v2/user/{}/networksummary", base_url, user_id)
}

/// Build network creation URL
pub fn networks_url(base_url: &str) -> String {
    format!("{}/v2/network", base_url)
}

/// Build URL of a single network
pub fn network_url(base_url: &str, uuid: &str) -> String {
    format!("{}/v2/network/{}", base_url, uuid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_server() {
        assert_eq!(normalize_server("public.ndexbio.org"), "http://public.ndexbio.org");
        assert_eq!(normalize_server("https://test.ndexbio.org/"), "https://test.ndexbio.org");
        assert_eq!(normalize_server("http://localhost:8080"), "http://localhost:8080");
    }

    #[test]
    fn test_user_urls() {
        assert_eq!(user_url("http://ndex"), "http://ndex/v2/user");
        assert_eq!(
            network_summary_url("http://ndex", "u-1"),
            "http://ndex/v2/user/u-1/networksummary"
        );
    }

    #[test]
    fn test_network_urls() {
        assert_eq!(networks_url("http://ndex"), "http://ndex/v2/network");
        assert_eq!(network_url("http://ndex", "abc"), "http://ndex/v2/network/abc");
    }
}
