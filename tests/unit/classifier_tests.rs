/*!
 * Tests for content classification of candidate translation files
 */

use std::fs;
use anyhow::Result;
use renextract::content::{ContentClassifier, ContentType};
use crate::common;

/// Test that a generated translation file is recognized
#[test]
fn test_classify_withTranslationFile_shouldBeTranslation() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "tl/french/script.rpy", common::SAMPLE_TRANSLATION)?;

    let result = ContentClassifier::new().classify(&path);

    assert!(result.is_translation);
    assert_eq!(result.file_type, ContentType::Translation);
    assert_eq!(result.confidence, 95.0);

    Ok(())
}

/// Test that screens code is rejected even with a translate block in the sample
#[test]
fn test_classify_withTechnicalAndTranslationMarkers_shouldPreferTechnical() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = common::lines_content(&["translate french label:", "screen main():", "    text \"Hi\""]);
    let path = common::create_test_file(temp_dir.path(), "screens.rpy", &content)?;

    let result = ContentClassifier::new().classify(&path);

    assert!(!result.is_translation);
    assert_eq!(result.file_type, ContentType::TechnicalCode);
    assert_eq!(result.confidence, 90.0);

    Ok(())
}

/// Test that an empty file fails closed
#[test]
fn test_classify_withZeroByteFile_shouldBeTechnicalWithNoConfidence() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "empty.rpy", "")?;

    let result = ContentClassifier::new().classify(&path);

    assert!(!result.is_translation);
    assert_eq!(result.file_type, ContentType::TechnicalCode);
    assert_eq!(result.confidence, 0.0);

    Ok(())
}

/// Test that a missing file fails closed instead of erroring
#[test]
fn test_classify_withMissingFile_shouldBeTechnicalWithNoConfidence() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let result = ContentClassifier::new().classify(temp_dir.path().join("absent.rpy"));

    assert_eq!(result.file_type, ContentType::TechnicalCode);
    assert_eq!(result.confidence, 0.0);
    assert!(result.reason.contains("Unable to read"));

    Ok(())
}

/// Test that a UTF-8 BOM does not hide the first translate block
#[test]
fn test_classify_withByteOrderMark_shouldStillDetectTranslation() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("bom.rpy");
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"translate french start_1:\n    e \"Salut\"\n");
    fs::write(&path, bytes)?;

    let result = ContentClassifier::new().classify(&path);

    assert!(result.is_translation);

    Ok(())
}

/// Test that non-.rpy candidates are invalid without being read
#[test]
fn test_classifyCandidate_withTextFile_shouldBeInvalid() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "notes.txt", common::SAMPLE_TRANSLATION)?;

    let result = ContentClassifier::new().classify_candidate(&path);

    assert!(!result.is_translation);
    assert_eq!(result.file_type, ContentType::Invalid);
    assert_eq!(result.confidence, 0.0);

    Ok(())
}

/// Test that .rpy candidates go through normal classification
#[test]
fn test_classifyCandidate_withRpyFile_shouldClassifyContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "script.RPY", common::SAMPLE_TRANSLATION)?;

    let result = ContentClassifier::new().classify_candidate(&path);

    assert_eq!(result.file_type, ContentType::Translation);

    Ok(())
}

/// Test that a plain script without markers is rejected with the middle confidence
#[test]
fn test_classify_withPlainScript_shouldRejectWithoutMarkers() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "script.rpy", "label start:\n    e \"Hi\"\n    return\n")?;

    let result = ContentClassifier::new().classify(&path);

    assert_eq!(result.file_type, ContentType::TechnicalCode);
    assert_eq!(result.confidence, 70.0);

    Ok(())
}

/// Test that only the leading non-empty lines of a file are sampled
#[test]
fn test_classify_withMarkerPastSample_shouldIgnoreLaterLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut content = String::new();
    for i in 0..25 {
        content.push_str(&format!("# comment {}\r\n\r\n", i));
    }
    content.push_str("translate french late_block:\r\n");
    let path = common::create_test_file(temp_dir.path(), "late.rpy", &content)?;

    let default_sample = ContentClassifier::new().classify(&path);
    let wide_sample = ContentClassifier::with_sample_lines(26).classify(&path);

    assert_eq!(default_sample.file_type, ContentType::TechnicalCode);
    assert_eq!(default_sample.confidence, 70.0);
    assert!(wide_sample.is_translation);

    Ok(())
}

/// Test that undecodable bytes after the sample do not affect the result
#[test]
fn test_classify_withInvalidBytesAfterSample_shouldClassifySample() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("mixed.rpy");
    let mut bytes = b"translate french start_1:\n    e \"Salut\"\n".to_vec();
    bytes.extend_from_slice(b"\xFF\xFE broken \xE9\n");
    fs::write(&path, bytes)?;

    let result = ContentClassifier::with_sample_lines(2).classify(&path);

    assert!(result.is_translation);

    Ok(())
}
