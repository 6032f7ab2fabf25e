extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn main_cmd(data_dir: &Path) -> Command {
        let mut cmd = Command::cargo_bin("trains").unwrap();
        cmd.arg("--data-dir").arg(data_dir);
        cmd
    }

    fn cmd_success(dir: &TempDir, cmd: &str, args: Vec<&str>) {
        main_cmd(dir.path())
            .arg(cmd)
            .args(args)
            .assert()
            .success();
    }
    fn cmd_should_print(dir: &TempDir, cmd: &str, args: Vec<&str>, expected: &str) {
        main_cmd(dir.path())
            .arg(cmd)
            .args(args)
            .assert()
            .success()
            .stdout(predicate::str::contains(expected));
    }
    fn cmd_should_report(dir: &TempDir, cmd: &str, args: Vec<&str>, expected: &str) {
        main_cmd(dir.path())
            .arg(cmd)
            .args(args)
            .assert()
            .success()
            .stderr(predicate::str::contains(expected));
    }

    fn add_sample_trains(dir: &TempDir) {
        cmd_should_print(
            dir,
            "add",
            vec!["-d", "Moscow", "-n", "001A", "-t", "10:30", "-s", "Leningradsky"],
            "Train 001A to Moscow added.",
        );
        cmd_should_print(
            dir,
            "add",
            vec![
                "-d",
                "Saint Petersburg",
                "-n",
                "002B",
                "-t",
                "14:00",
                "-s",
                "Moscow",
            ],
            "Train 002B to Saint Petersburg added.",
        );
    }

    #[test]
    fn add_list_and_find() {
        let dir = tempfile::tempdir().unwrap();
        cmd_should_print(&dir, "list", vec![], "No trains registered.");

        add_sample_trains(&dir);
        assert!(dir.path().join("trains.db").is_file());

        main_cmd(dir.path())
            .arg("list")
            .assert()
            .success()
            .stdout(
                predicate::str::contains(
                    "Train 001A departs to Moscow at 10:30, station: Leningradsky.",
                )
                .and(predicate::str::contains(
                    "Train 002B departs to Saint Petersburg at 14:00, station: Moscow.",
                )),
            );

        cmd_should_print(
            &dir,
            "find",
            vec!["001A"],
            "Train 001A departs to Moscow at 10:30, station: Leningradsky.",
        );
        cmd_should_print(&dir, "find", vec!["999Z"], "Train with number 999Z not found.");
    }

    #[test]
    fn duplicate_numbers_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        add_sample_trains(&dir);

        cmd_should_report(
            &dir,
            "add",
            vec!["-d", "Kazan", "-n", "001A", "-t", "23:00", "-s", "Kazansky"],
            "a train with number 001A already exists",
        );
        cmd_should_print(
            &dir,
            "find",
            vec!["001A"],
            "Train 001A departs to Moscow at 10:30, station: Leningradsky.",
        );
    }

    #[test]
    fn save_and_load_xml() {
        let source_dir = tempfile::tempdir().unwrap();
        let target_dir = tempfile::tempdir().unwrap();
        let xml_file = source_dir.path().join("trains.xml");
        let xml_path = xml_file.to_str().unwrap();

        add_sample_trains(&source_dir);
        cmd_should_print(&source_dir, "save-xml", vec![xml_path], "Saved 2 trains");
        let content = std::fs::read_to_string(&xml_file).unwrap();
        assert!(content.contains("<number>001A</number>"));
        assert!(content.contains("<station_name>Moscow</station_name>"));

        cmd_should_print(
            &target_dir,
            "load-xml",
            vec![xml_path],
            "2 trains imported, 0 skipped.",
        );
        cmd_should_print(
            &target_dir,
            "find",
            vec!["002B"],
            "Train 002B departs to Saint Petersburg at 14:00, station: Moscow.",
        );

        // Reloading into the same database only produces conflicts
        main_cmd(target_dir.path())
            .arg("load-xml")
            .arg(xml_path)
            .assert()
            .success()
            .stdout(predicate::str::contains("0 trains imported, 2 skipped."))
            .stderr(predicate::str::contains(
                "Skipped train 001A: number already exists.",
            ));
    }

    #[test]
    fn malformed_xml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let xml_file = dir.path().join("broken.xml");
        std::fs::write(
            &xml_file,
            "<trains><train><number>001A</number></train></trains>",
        )
        .unwrap();

        cmd_should_report(
            &dir,
            "load-xml",
            vec![xml_file.to_str().unwrap()],
            "has no <destination> element",
        );
        cmd_should_print(&dir, "list", vec![], "No trains registered.");
    }

    #[test]
    fn unusable_data_dir_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        main_cmd(&blocker.join("data"))
            .arg("list")
            .assert()
            .success()
            .stderr(predicate::str::contains("could not create data directory"));
    }

    #[test]
    fn separate_databases_by_name() {
        let dir = tempfile::tempdir().unwrap();
        add_sample_trains(&dir);

        main_cmd(dir.path())
            .args(vec!["--db-name", "other", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No trains registered."));
        assert!(dir.path().join("other.db").is_file());
    }

    #[test]
    fn log_format_selects_formatter() {
        let dir = tempfile::tempdir().unwrap();

        // The pretty formatter prints the source location of every event
        main_cmd(dir.path())
            .env_remove("RUST_LOG")
            .args(vec!["--log-format", "pretty", "list"])
            .assert()
            .success()
            .stderr(predicate::str::contains("train_db/mod.rs"));
        main_cmd(dir.path())
            .env_remove("RUST_LOG")
            .args(vec!["--log-format", "compact", "list"])
            .assert()
            .success()
            .stderr(predicate::str::contains("train_db/mod.rs").not());
    }
}
