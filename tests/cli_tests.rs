//! CLI integration tests using assert_cmd.
//!
//! Every subcommand runs against the built `eratos` binary.
//! Config-file tests write into `tempfile` temp files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

#[allow(deprecated)]
fn eratos() -> Command {
    let mut cmd = Command::cargo_bin("eratos").unwrap();
    cmd.env_remove("ERATOS_CONFIG").env_remove("LOG_FORMAT");
    cmd
}

// --- Help and arg validation ---

#[test]
fn help_shows_all_subcommands() {
    eratos().arg("--help").assert().success().stdout(
        predicate::str::contains("primes")
            .and(predicate::str::contains("count"))
            .and(predicate::str::contains("nth"))
            .and(predicate::str::contains("sum"))
            .and(predicate::str::contains("is-prime"))
            .and(predicate::str::contains("factor"))
            .and(predicate::str::contains("divisors"))
            .and(predicate::str::contains("square-free"))
            .and(predicate::str::contains("twins"))
            .and(predicate::str::contains("constellation"))
            .and(predicate::str::contains("polynomial")),
    );
}

#[test]
fn unknown_subcommand_fails() {
    eratos()
        .arg("nonexistent")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn factor_requires_values() {
    eratos()
        .arg("factor")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

// --- Queries ---

#[test]
fn primes_to_30() {
    eratos()
        .args(["primes", "--limit", "30"])
        .assert()
        .success()
        .stdout("2 3 5 7 11 13 17 19 23 29\n");
}

#[test]
fn primes_below_two_is_empty_line() {
    eratos()
        .args(["primes", "--limit", "1"])
        .assert()
        .success()
        .stdout("\n");
}

#[test]
fn count_to_1000() {
    eratos()
        .args(["count", "--limit", "1000"])
        .assert()
        .success()
        .stdout("pi(1000) = 168\n");
}

#[test]
fn nth_prime_100() {
    eratos()
        .args(["nth", "100"])
        .assert()
        .success()
        .stdout("prime(100) = 541\n");
}

#[test]
fn sum_first_10() {
    eratos()
        .args(["sum", "10"])
        .assert()
        .success()
        .stdout("sum of first 10 primes = 129\n");
}

#[test]
fn is_prime_reports_unknown_beyond_square() {
    eratos()
        .args(["is-prime", "--limit", "10", "7", "9", "97", "101"])
        .assert()
        .success()
        .stdout("7: prime\n9: composite\n97: prime\n101: unknown\n");
}

#[test]
fn factor_flat_and_unique() {
    eratos()
        .args(["factor", "12", "360", "97"])
        .assert()
        .success()
        .stdout("12: 2 2 3\n360: 2 2 2 3 3 5\n97: 97\n");
    eratos()
        .args(["factor", "--unique", "360"])
        .assert()
        .success()
        .stdout("360: 2^3 3^2 5\n");
}

#[test]
fn divisors_and_square_free() {
    eratos()
        .args(["divisors", "1", "6", "360"])
        .assert()
        .success()
        .stdout("1: 1\n6: 4\n360: 24\n");
    eratos()
        .args(["square-free", "4", "10"])
        .assert()
        .success()
        .stdout("4: false\n10: true\n");
}

#[test]
fn twins_and_constellation() {
    eratos()
        .args(["twins", "--limit", "1000"])
        .assert()
        .success()
        .stdout("[0,2] <= 1000: 35\n");
    eratos()
        .args(["constellation", "--limit", "100", "--offsets", "0,2,6"])
        .assert()
        .success()
        .stdout("[0,2,6] <= 100: 4\n");
}

#[test]
fn polynomial_count() {
    eratos()
        .args(["polynomial", "--upper", "100"])
        .assert()
        .success()
        .stdout("2n^2-1 primes for n in [2, 100]: 45\n");
}

#[test]
fn polynomial_upper_past_u64_domain_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[sieve]\nmax_limit = 9223372036854775807").unwrap();
    eratos()
        .arg("--config")
        .arg(file.path())
        .args(["polynomial", "--upper", "3037000500"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("would overflow u64"));
}

#[test]
fn json_output() {
    eratos()
        .args(["--json", "factor", "--unique", "12"])
        .assert()
        .success()
        .stdout("{\"value\":12,\"factors\":[{\"prime\":2,\"exponent\":2},{\"prime\":3,\"exponent\":1}]}\n");
    eratos()
        .args(["--json", "count", "--limit", "100"])
        .assert()
        .success()
        .stdout("{\"limit\":100,\"count\":25}\n");
}

// --- Config file ---

#[test]
fn config_file_sets_json_output() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[output]\nformat = \"json\"").unwrap();
    eratos()
        .arg("--config")
        .arg(file.path())
        .args(["is-prime", "7"])
        .assert()
        .success()
        .stdout("{\"value\":7,\"primality\":\"prime\"}\n");
}

#[test]
fn config_max_limit_rejects_large_sieve() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[sieve]\nmax_limit = 1000").unwrap();
    eratos()
        .arg("--config")
        .arg(file.path())
        .args(["count", "--limit", "5000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds max_limit"));
}

#[test]
fn invalid_config_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[sieve]\nfactor_margin = 1").unwrap();
    eratos()
        .arg("--config")
        .arg(file.path())
        .args(["count", "--limit", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("factor_margin"));
}

#[test]
fn config_from_env_var() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[output]\nformat = \"json\"").unwrap();
    eratos()
        .env("ERATOS_CONFIG", file.path())
        .args(["divisors", "6"])
        .assert()
        .success()
        .stdout("{\"value\":6,\"divisors\":4}\n");
}
