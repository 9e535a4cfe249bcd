fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use upwatch_protocol::{
        FileManifest, FileProgress, ProgressMessage, SelectedFile, TotalProgress, build_manifest,
    };

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Deserializes a fixture into a Rust type, re-serializes it, and compares
    /// the JSON values (key-order independent).
    fn roundtrip_test<T>(name: &str) -> T
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  server: {fixture}\n  client: {reserialized}"
        );
        parsed
    }

    // --- Progress messages ---

    #[test]
    fn fixture_progress_message() {
        let msg = roundtrip_test::<ProgressMessage>("progress_message.json");
        assert_eq!(msg.files["x.txt"], FileProgress(1024, 2048));
        assert_eq!(msg.files["photos/a.jpg"], FileProgress(0, 5242880));
        assert!(msg.total.is_none(), "missing total should default to None");
    }

    #[test]
    fn fixture_progress_message_total() {
        let msg = roundtrip_test::<ProgressMessage>("progress_message_total.json");
        assert_eq!(msg.total, Some(TotalProgress(4096, Some(8192))));
        assert_eq!(msg.files.len(), 2);
    }

    #[test]
    fn fixture_progress_message_unknown_length() {
        let msg = roundtrip_test::<ProgressMessage>("progress_message_unknown_length.json");
        let total = msg.total.expect("total present");
        assert_eq!(total.received(), 4096);
        assert_eq!(total.length(), None);
    }

    #[test]
    fn progress_message_ignores_extra_keys() {
        // Servers may add fields; the client only reads `files` and `total`.
        let json = r#"{"files":{"x.txt":[1,2]},"server":"test","seq":7}"#;
        let msg = ProgressMessage::parse(json).unwrap();
        assert_eq!(msg.files["x.txt"], FileProgress(1, 2));
    }

    #[test]
    fn progress_message_rejects_bad_pairs() {
        for json in [
            r#"{"files":{"x.txt":[1]}}"#,
            r#"{"files":{"x.txt":[1,2,3]}}"#,
            r#"{"files":{"x.txt":"1/2"}}"#,
            r#"{"files":{"x.txt":[-1,2]}}"#,
            r#"{"total":[1,2]}"#,
        ] {
            assert!(ProgressMessage::parse(json).is_err(), "accepted {json}");
        }
    }

    // --- Upload manifest ---

    #[test]
    fn fixture_file_manifest() {
        let manifest = roundtrip_test::<FileManifest>("file_manifest.json");
        assert_eq!(manifest.len(), 3);
        assert_eq!(manifest.get("empty.dat"), Some(0));
    }

    #[test]
    fn built_manifest_matches_fixture() {
        let files = [
            SelectedFile::new("x.txt", 2048),
            SelectedFile::new("photos/a.jpg", 5242880),
            SelectedFile::new("empty.dat", 0),
        ];
        let built: serde_json::Value =
            serde_json::from_str(&build_manifest(&files).unwrap()).unwrap();
        assert_eq!(built, load_fixture("file_manifest.json"));
    }
}
