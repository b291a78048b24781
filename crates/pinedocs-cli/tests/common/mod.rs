#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::time::Duration;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(30);

/// Create a configured `pinedocs` command suitable for integration tests.
#[allow(dead_code)]
pub fn pinedocs_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pinedocs"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Rendered reference page with one item per section family under test.
#[allow(dead_code)]
pub const REFERENCE_PAGE: &str = r#"
<html><body>
<div class="tv-pine-reference-item" id="fun_alert">
  <h3>alert()</h3>
  <div class="tv-pine-reference-item__content">
    <div class="tv-pine-reference-item__text">Creates an alert event.</div>
    <div class="tv-pine-reference-item__sub-header">Syntax</div>
    <pre><code>alert(message, freq) → void</code></pre>
  </div>
</div>
<div class="tv-pine-reference-item" id="var_close">
  <h3>close</h3>
  <div class="tv-pine-reference-item__content">
    <div class="tv-pine-reference-item__text">Close price of the current bar.</div>
  </div>
</div>
</body></html>
"#;

/// Welcome page: doubles as the navigation source and a content page.
#[allow(dead_code)]
pub const WELCOME_PAGE: &str = r#"
<html><body>
<nav>
  <a href="/pine-script-docs/welcome/">Welcome</a>
  <a href="/pine-script-docs/concepts/alerts/">Alerts</a>
</nav>
<main>
  <h1>Welcome</h1>
  <p>Introduction to Pine Script.</p>
</main>
</body></html>
"#;

#[allow(dead_code)]
pub const ALERTS_PAGE: &str = r##"
<html><body>
<nav><a href="/pine-script-docs/welcome/">Welcome</a></nav>
<main>
  <h1>Alerts</h1>
  <p>Alerts fire when their condition is met.</p>
  <h2>On this page</h2>
  <ul><li><a href="#background">Background</a></li></ul>
</main>
</body></html>
"##;
