//! Test fixtures - reusable content constants for tests.

pub const ACCOUNT: &str = "123456789012";

/// One site in us-west-2 under `example.com`, with fast certificate polling
pub const SINGLE_SITE_CONFIG: &str = r#"
[provider]
account = "123456789012"
region = "us-west-2"

[validation]
timeout_secs = 30
initial_backoff_secs = 1
max_backoff_secs = 1

[[site]]
domain = "docs.example.com"
source = "public"
stack = "prod-DocsStack"
"#;

/// The privacy policy and support sites sharing one zone
pub const TWO_SITE_CONFIG: &str = r#"
[provider]
account = "123456789012"
region = "us-west-2"

[validation]
timeout_secs = 30
initial_backoff_secs = 1
max_backoff_secs = 1

[[site]]
domain = "privacy.example.com"
source = "docs/privacy_policy"
hosted_zone = "example.com"

[[site]]
domain = "support.example.com"
source = "docs/support"
"#;

pub const INDEX_HTML: &str = "<!doctype html><title>Docs</title><h1>Docs</h1>\n";

pub const ERROR_HTML: &str = "<!doctype html><title>Not found</title>\n";

pub const STYLE_CSS: &str = "body { font-family: sans-serif; }\n";

/// Local cloud file holding one public zone for `example.com`
pub fn cloud_with_zone(zone: &str) -> String {
    serde_json::json!({
        "zones": [{
            "account": ACCOUNT,
            "zone": {
                "zone_id": "ZTESTZONE0001",
                "domain_suffix": zone,
                "private_zone": false,
            }
        }]
    })
    .to_string()
}
