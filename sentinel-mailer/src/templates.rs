use sentinel_core::domain::HealthStatus;

const HTML_TEMPLATE: &str = r#"<html>
<body style="font-family: sans-serif;">
<h2>Website Status Update</h2>
<p>The website <strong>{{website_url}}</strong> is now <strong>{{status}}</strong>.</p>
<p style="color: #888; font-size: 12px;">&copy; {{year}} Sentinel Uptime Monitor</p>
</body>
</html>"#;

const PLAIN_TEMPLATE: &str = r#"Website Status Update

The website {{website_url}} is now {{status}}.

(c) {{year}} Sentinel Uptime Monitor"#;

fn render(template: &str, website_url: &str, status: HealthStatus, year: i32) -> String {
    template
        .replace("{{website_url}}", website_url)
        .replace("{{status}}", status.as_str())
        .replace("{{year}}", &year.to_string())
}

pub fn render_html_body(website_url: &str, status: HealthStatus, year: i32) -> String {
    render(HTML_TEMPLATE, website_url, status, year)
}

pub fn render_plain_text_body(website_url: &str, status: HealthStatus, year: i32) -> String {
    render(PLAIN_TEMPLATE, website_url, status, year)
}

pub const SUBJECT: &str = "Website Status Update";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_body_substitutes_all_placeholders() {
        let body = render_html_body("https://example.com", HealthStatus::Unhealthy, 2026);
        assert!(body.contains("https://example.com"));
        assert!(body.contains("UNHEALTHY"));
        assert!(body.contains("2026"));
        assert!(!body.contains("{{"));
    }

    #[test]
    fn plain_body_substitutes_all_placeholders() {
        let body = render_plain_text_body("https://example.com", HealthStatus::Healthy, 2026);
        assert!(body.contains("https://example.com"));
        assert!(body.contains("HEALTHY"));
        assert!(!body.contains("{{"));
    }
}
