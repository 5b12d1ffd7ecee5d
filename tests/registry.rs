use std::sync::Arc;
use std::thread;

use license_matchr::{bigrams, dice_coefficient, EmbeddedTemplates, Registry, TemplateSource};

fn registry() -> Registry {
    Registry::build(&EmbeddedTemplates::new()).expect("embedded templates are complete")
}

#[test]
fn url_scenarios() {
    let registry = registry();
    let mit = registry
        .find_by_url("https://opensource.org/licenses/MIT")
        .expect("MIT url is known");
    assert_eq!(mit.name(), "MIT License");
    assert!(mit.allows_decompilation());

    assert!(registry.find_by_url("https://example.com/nope").is_none());
}

#[test]
fn every_template_identifies_itself() {
    let registry = registry();
    let source = EmbeddedTemplates::new();
    for license in &registry {
        let text = source.load(license.template_name()).unwrap();
        assert_eq!(registry.find_by_text(&text).unwrap().name(), license.name());
    }
}

#[test]
fn lightly_edited_text_still_matches() {
    let registry = registry();
    let apache = EmbeddedTemplates::new().load("Apache2").unwrap();
    let edited = apache.replace("[yyyy] [name of copyright owner]", "2021 Example Foundation");

    let m = registry.rank_text(&edited).unwrap();
    assert_eq!(m.license.spdx_id(), "Apache-2.0");
    assert!(m.score > 0.9 && m.score < 1.0);
}

#[test]
fn template_similarity_is_symmetric_and_bounded() {
    let registry = registry();
    let licenses: Vec<_> = registry.iter().collect();

    for a in &licenses {
        for b in &licenses {
            let ab = dice_coefficient(a.template_bigrams(), b.template_bigrams());
            let ba = dice_coefficient(b.template_bigrams(), a.template_bigrams());
            assert_eq!(ab, ba, "{} vs {}", a.name(), b.name());
            assert!((0.0..=1.0).contains(&ab));
            if a.name() != b.name() {
                assert!(ab < 1.0, "{} and {} share every bigram", a.name(), b.name());
            }
        }
        let empty = bigrams("");
        assert_eq!(dice_coefficient(a.template_bigrams(), &empty), 0.0);
    }
}

#[test]
fn shared_across_threads() {
    let registry = Arc::new(registry());
    let gpl3 = registry.get("GPL-3.0").unwrap().template_text().to_string();
    let gpl3 = Arc::new(gpl3);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let gpl3 = Arc::clone(&gpl3);
            thread::spawn(move || {
                if i % 2 == 0 {
                    registry
                        .find_by_url("https://www.gnu.org/licenses/gpl-3.0.html")
                        .map(|l| l.spdx_id().to_string())
                } else {
                    registry.find_by_text(&gpl3).map(|l| l.spdx_id().to_string())
                }
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().as_deref(), Some("GPL-3.0"));
    }
}
