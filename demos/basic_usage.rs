//! Example usage of alphabetical pagination over a redb record store.
//!
//! Seeds a small directory of people, then walks a few requests the way a
//! web handler would: read the requested letter, resolve, render the bar.

use redb::{Database, ReadableDatabase};
use redb_alphabar::{
    navigation, AlphaScopeExt, AlphabarConfig, NavOptions, PaginatorView, Record, RecordStore,
};

const PEOPLE: &[&str] = &[
    "Ada Lovelace",
    "Alan Turing",
    "Barbara Liskov",
    "Claude Shannon",
    "Donald Knuth",
    "",
    "Edsger Dijkstra",
    "edgar codd",
    "Frances Allen",
    "Grace Hopper",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let temp_file = tempfile::NamedTempFile::new()?;
    let db = Database::create(temp_file.path())?;
    let store = RecordStore::new("people");

    // Loaded once at startup and passed explicitly from here on
    let config = AlphabarConfig::from_env().with_all_option(true);

    let write_txn = db.begin_write()?;
    store.define_field(&write_txn, "name")?;
    for (id, name) in (1u64..).zip(PEOPLE) {
        store.insert(&write_txn, &Record::new(id).with("name", Some(*name)))?;
    }
    store.insert(&write_txn, &Record::new(100))?;
    write_txn.commit()?;

    let read_txn = db.begin_read()?;
    let source = store.source(&read_txn);

    for request in [None, Some("e"), Some("Blank"), Some("Q"), Some("All")] {
        let (records, paginator) = source.alpha_scope_with("name", request, &config, |_| {})?;

        println!(
            "\nrequest {:?} -> group {} ({} of {} records)",
            request,
            paginator
                .effective_group()
                .map(|group| group.to_string())
                .unwrap_or_default(),
            records.len(),
            paginator.total_count()
        );

        if let Some(nav) = navigation(&paginator, &NavOptions::from(&config)) {
            let bar: Vec<String> = nav
                .slots
                .iter()
                .map(|slot| match (slot.current, nav.query_for(slot)) {
                    (true, _) => format!("[{}]", slot.label()),
                    (false, Some((param, value))) => {
                        format!("{}?{}={}", slot.label(), param, value)
                    }
                    (false, None) => slot.label(),
                })
                .collect();
            println!("{}", bar.join(" "));
        }

        for record in source.load(&records)? {
            println!("  #{} {:?}", record.id, record.value("name"));
        }
    }

    Ok(())
}
