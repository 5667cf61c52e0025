/*!
 * Tests for quote repair on translated text files
 */

use std::fs;
use anyhow::Result;
use renextract::normalizer::{fix_unescaped_quotes_in_txt, QuoteNormalizer};
use crate::common;

/// Test that every artifact kind is repaired and counted
#[test]
fn test_normalize_file_withMixedArtifacts_shouldRepairAndCount() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = common::lines_content(&[
        "Il a dit \"bonjour\"",
        "« Salut » et <<au revoir>>",
        "Attends [...]",
        "100% sûr, mais %s reste",
    ]);
    let path = common::create_test_file(temp_dir.path(), "script_dialogue.txt", &content)?;

    let counts = QuoteNormalizer::normalize_file(&path)?;

    assert_eq!(counts.quotes, 2);
    assert_eq!(counts.guillemets, 4);
    assert_eq!(counts.ellipses, 1);
    assert_eq!(counts.percents, 1);
    assert_eq!(
        fs::read_to_string(&path)?,
        common::lines_content(&[
            r#"Il a dit \"bonjour\""#,
            r#"\" Salut \" et \"au revoir\""#,
            "Attends ...",
            "100%% sûr, mais %s reste",
        ])
    );

    Ok(())
}

/// Test that a second pass finds nothing and leaves the bytes alone
#[test]
fn test_fix_unescaped_quotes_in_txt_runTwice_shouldBeIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = common::lines_content(&["Elle crie \"non\" [...] à 50%", "<<Vite>>"]);
    let path = common::create_test_file(temp_dir.path(), "script_asterix.txt", &content)?;

    let first = fix_unescaped_quotes_in_txt(&path);
    let after_first = fs::read(&path)?;
    let second = fix_unescaped_quotes_in_txt(&path);

    assert!(first > 0);
    assert_eq!(second, 0);
    assert_eq!(fs::read(&path)?, after_first);

    Ok(())
}

/// Test that clean files are not rewritten
#[test]
fn test_normalize_file_withCleanFile_shouldNotRewrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = "Rien à corriger ici\nNi là\n";
    let path = common::create_test_file(temp_dir.path(), "clean.txt", content)?;
    let modified_before = fs::metadata(&path)?.modified()?;

    let counts = QuoteNormalizer::normalize_file(&path)?;

    assert_eq!(counts.total(), 0);
    assert_eq!(fs::read_to_string(&path)?, content);
    assert_eq!(fs::metadata(&path)?.modified()?, modified_before);

    Ok(())
}

/// Test that Windows line endings survive the repair
#[test]
fn test_normalize_file_withCrlfEndings_shouldPreserveTerminators() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "crlf.txt", "\"a\"\r\nb\r\nc")?;

    QuoteNormalizer::normalize_file(&path)?;

    assert_eq!(fs::read_to_string(&path)?, "\\\"a\\\"\r\nb\r\nc");

    Ok(())
}

/// Test that a missing file yields zero corrections instead of an error
#[test]
fn test_fix_unescaped_quotes_in_txt_withMissingFile_shouldReturnZero() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    assert_eq!(fix_unescaped_quotes_in_txt(temp_dir.path().join("absent.txt")), 0);
    assert!(QuoteNormalizer::normalize_file(temp_dir.path().join("absent.txt")).is_err());

    Ok(())
}

/// Test that a UTF-8 BOM survives the rewrite
#[test]
fn test_normalize_file_withByteOrderMark_shouldKeepIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("bom_dialogue.txt");
    fs::write(&path, b"\xEF\xBB\xBFIl a dit \"oui\"\n")?;

    let counts = QuoteNormalizer::normalize_file(&path)?;

    assert_eq!(counts.quotes, 2);
    let mut expected = vec![0xEF, 0xBB, 0xBF];
    expected.extend_from_slice(b"Il a dit \\\"oui\\\"\n");
    assert_eq!(fs::read(&path)?, expected);

    Ok(())
}

/// Test that files without a BOM do not gain one
#[test]
fn test_normalize_file_withoutByteOrderMark_shouldNotAddOne() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "plain.txt", "\"a\"\n")?;

    QuoteNormalizer::normalize_file(&path)?;

    assert!(fs::read(&path)?.starts_with(b"\\\"a"));

    Ok(())
}
