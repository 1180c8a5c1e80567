//! Shared static assets: the interaction script and its versioned URL.

use sha2::{Digest, Sha256};

/// Filename the interaction script is written under, next to the pages.
pub const SCRIPT_FILENAME: &str = "product-page.js";

/// Click and keyboard accordion for FAQ entries, plus the sticky CTA bar
/// that appears past a scroll threshold. One copy serves every page; the
/// class hooks match what the renderer emits.
pub const PAGE_SCRIPT: &str = r#"(function () {
  "use strict";

  function toggle(question) {
    question.classList.toggle("open");
    var answer = question.nextElementSibling;
    if (answer) answer.classList.toggle("open");
  }

  document.querySelectorAll(".product-faq-question").forEach(function (question) {
    question.addEventListener("click", function () {
      toggle(question);
    });
    question.addEventListener("keydown", function (event) {
      if (event.key === "Enter" || event.key === " ") {
        event.preventDefault();
        toggle(question);
      }
    });
  });

  var bar = document.getElementById("stickyCta");
  if (!bar) return;
  window.addEventListener("scroll", function () {
    if (window.scrollY > 300) {
      bar.style.display = "flex";
      document.body.style.paddingBottom = bar.offsetHeight + "px";
    } else {
      bar.style.display = "none";
      document.body.style.paddingBottom = "0px";
    }
  });
})();
"#;

/// Short content hash used as the `?v=` cache-busting query value, so a
/// changed script rolls out even behind long-lived caches.
pub fn asset_version(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

/// Relative URL pages use to load the interaction script.
pub fn script_href() -> String {
    format!("{}?v={}", SCRIPT_FILENAME, asset_version(PAGE_SCRIPT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_stable_for_identical_content() {
        assert_eq!(asset_version("abc"), asset_version("abc"));
        assert_ne!(asset_version("abc"), asset_version("abd"));
        assert_eq!(asset_version("abc").len(), 8);
    }

    #[test]
    fn script_targets_the_rendered_hooks() {
        assert!(PAGE_SCRIPT.contains(".product-faq-question"));
        assert!(PAGE_SCRIPT.contains("stickyCta"));
        assert!(script_href().starts_with("product-page.js?v="));
    }
}
