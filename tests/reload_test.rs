//! Readers never observe a half-replaced catalog.

#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use std::sync::Arc;
use std::sync::atomic::{
    AtomicBool,
    Ordering,
};
use std::thread;

use vicare_i18n::TranslationCatalog;
use vicare_i18n::input::shared::SharedStrings;
use vicare_i18n::store::TranslationStore;

const WRITES: u64 = 200;

fn catalog(version: u64) -> TranslationCatalog {
    let source = format!(
        r#"{{
  "entity": {{
    "number": {{
      "normal_temperature": {{ "name": "Normal temperature v{version}" }},
      "normal_heating_temperature": {{
        "name": "[%key:component::vicare::entity::number::normal_temperature::name%]"
      }}
    }},
    "sensor": {{ "outside_temperature": {{ "name": "Outside temperature v{version}" }} }}
  }}
}}"#
    );
    TranslationCatalog::load("vicare", &source, SharedStrings::empty()).unwrap()
}

fn version_of(value: &str) -> &str {
    value.rsplit_once(" v").map_or("", |(_, version)| version)
}

#[test]
fn readers_see_whole_catalogs_during_publishes() {
    let store = Arc::new(TranslationStore::new(catalog(0)));
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut reads = 0_u64;
                let mut last_generation = 0;
                while !done.load(Ordering::Acquire) || reads == 0 {
                    let (snapshot, generation) = store.snapshot_with_generation();
                    let temperature =
                        snapshot.resolve("entity.number.normal_heating_temperature.name").unwrap();
                    let outside = snapshot.resolve("entity.sensor.outside_temperature.name").unwrap();

                    assert_eq!(version_of(&temperature), version_of(&outside));
                    assert_eq!(version_of(&outside), generation.to_string());
                    assert!(generation >= last_generation);
                    last_generation = generation;
                    reads += 1;
                }
                reads
            })
        })
        .collect();

    for version in 1..=WRITES {
        assert_eq!(store.publish(catalog(version)), version);
    }
    done.store(true, Ordering::Release);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    assert_eq!(store.generation(), WRITES);
}

#[test]
fn snapshot_outlives_publish() {
    let store = TranslationStore::new(catalog(0));
    let before = store.snapshot();

    store.publish(catalog(1));

    assert_eq!(
        before.resolve("entity.sensor.outside_temperature.name").unwrap(),
        "Outside temperature v0"
    );
    assert_eq!(
        store.snapshot().resolve("entity.sensor.outside_temperature.name").unwrap(),
        "Outside temperature v1"
    );
}
