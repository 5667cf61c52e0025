/*!
 * Pre-reconstruction checks over realistic extraction output folders
 */

use anyhow::Result;
use renextract::validation::{FileKind, ReconstructionGate};
use crate::common;

/// Test that a complete flat output passes
#[test]
fn test_gate_withAllFilesMatching_shouldAuthorizeReconstruction() -> Result<()> {
    common::init_test_logging();
    let root = common::create_temp_dir()?;
    let dir = common::create_flat_output(root.path(), "MyGame")?;
    common::create_test_file(&dir, "script_dialogue.txt", &common::dialogue_content(5))?;
    common::create_test_file(&dir, "script_asterix.txt", &common::lines_content(&["*soupir*", "*rire*"]))?;
    common::create_test_file(&dir, "script_empty.txt", &common::lines_content(&["", "", ""]))?;

    let result = ReconstructionGate::new(root.path()).validate_before_reconstruction("script", 5, 2, 3);

    assert!(result.overall_valid, "errors: {:?}", result.summary.errors);
    assert_eq!(result.summary.files_checked, 3);
    assert_eq!(result.summary.total_expected, 10);
    assert_eq!(result.summary.total_found, 10);
    assert!(result.failed_kinds().is_empty());

    Ok(())
}

/// Test that a missing dialogue file is the only failing kind in a flat output folder
#[test]
fn test_gate_withMissingDialogueFileInFlatLayout_shouldFailOnDialogueOnly() -> Result<()> {
    common::init_test_logging();
    let root = common::create_temp_dir()?;
    common::create_flat_output(root.path(), "MyGame")?;

    let result = ReconstructionGate::new(root.path()).validate_before_reconstruction("script", 5, 0, 0);

    assert!(!result.overall_valid);
    assert_eq!(result.failed_kinds(), vec![FileKind::Dialogue]);
    assert_eq!(result.files_validated.len(), 1);
    assert_eq!(result.summary.files_checked, 1);
    assert_eq!(result.summary.total_found, 0);
    assert_eq!(result.summary.errors.len(), 1);
    assert!(result.summary.errors[0].starts_with("[dialogue]"));

    Ok(())
}

/// Test that a missing dialogue file is the only failing kind in a nested output folder
#[test]
fn test_gate_withMissingDialogueFileInNestedLayout_shouldFailOnDialogueOnly() -> Result<()> {
    common::init_test_logging();
    let root = common::create_temp_dir()?;
    common::create_nested_output(root.path(), "MyGame", "script")?;

    let result = ReconstructionGate::new(root.path()).validate_before_reconstruction("script", 5, 0, 0);

    assert!(!result.overall_valid);
    assert_eq!(result.failed_kinds(), vec![FileKind::Dialogue]);
    assert_eq!(result.files_validated.len(), 1);
    assert_eq!(result.summary.total_found, 0);
    assert_eq!(result.summary.errors.len(), 1);
    assert!(result.summary.errors[0].starts_with("[dialogue]"));

    Ok(())
}

/// Test that every failing file is reported, not just the first one
#[test]
fn test_gate_withSeveralProblems_shouldReportAllOfThem() -> Result<()> {
    common::init_test_logging();
    let root = common::create_temp_dir()?;
    let dir = common::create_flat_output(root.path(), "MyGame")?;
    common::create_test_file(&dir, "script_dialogue.txt", &common::dialogue_content(3))?;

    let result = ReconstructionGate::new(root.path()).validate_before_reconstruction("script", 5, 2, 1);

    assert!(!result.overall_valid);
    assert_eq!(
        result.failed_kinds(),
        vec![FileKind::Dialogue, FileKind::Asterix, FileKind::Empty]
    );
    assert_eq!(result.summary.files_checked, 3);
    assert_eq!(result.summary.errors.len(), 3);
    assert_eq!(result.summary.total_found, 3);

    Ok(())
}

/// Test that the empty-text file is found in the untranslated folder
#[test]
fn test_gate_withEmptyFileInUntranslatedFolder_shouldFindIt() -> Result<()> {
    common::init_test_logging();
    let root = common::create_temp_dir()?;
    let dir = common::create_flat_output(root.path(), "MyGame")?;
    common::create_test_file(&dir, "script_dialogue.txt", &common::dialogue_content(2))?;
    common::create_test_file(
        &root.path().join("MyGame").join("fichiers_a_ne_pas_traduire"),
        "script_empty.txt",
        &common::lines_content(&["", ""]),
    )?;

    let result = ReconstructionGate::new(root.path()).validate_before_reconstruction("script", 2, 0, 2);

    assert!(result.overall_valid, "errors: {:?}", result.summary.errors);
    assert_eq!(result.files_validated[&FileKind::Empty].translation_count, 2);

    Ok(())
}

/// Test that surplus lines are surfaced as warnings without blocking
#[test]
fn test_gate_withSurplusLines_shouldWarnButAuthorize() -> Result<()> {
    common::init_test_logging();
    let root = common::create_temp_dir()?;
    let dir = common::create_flat_output(root.path(), "MyGame")?;
    common::create_test_file(&dir, "script_dialogue.txt", &common::dialogue_content(4))?;
    common::create_test_file(&dir, "script_dialogue_1.txt", &common::dialogue_content(2))?;

    let result = ReconstructionGate::new(root.path()).validate_before_reconstruction("script", 5, 0, 0);

    assert!(result.overall_valid);
    let report = &result.files_validated[&FileKind::Dialogue];
    assert!(!report.valid);
    assert_eq!(report.extra_count, 1);
    assert_eq!(result.summary.warnings.len(), 1);
    assert!(result.summary.warnings[0].starts_with("[dialogue]"));

    Ok(())
}

/// Test that the duplicates check never blocks reconstruction
#[test]
fn test_gate_withDuplicateDetection_shouldNeverBlock() -> Result<()> {
    common::init_test_logging();
    let root = common::create_temp_dir()?;
    let dir = common::create_flat_output(root.path(), "MyGame")?;
    common::create_test_file(&dir, "script_dialogue.txt", &common::dialogue_content(2))?;
    let gate = ReconstructionGate::new(root.path()).with_duplicate_detection(true);

    let without_file = gate.validate_before_reconstruction("script", 2, 0, 0);

    assert!(without_file.overall_valid);
    assert_eq!(without_file.summary.files_checked, 2);
    assert_eq!(without_file.summary.warnings.len(), 1);
    assert!(without_file.files_validated[&FileKind::Duplicates].valid);

    common::create_test_file(&dir, "script_doublons.txt", &common::lines_content(&["a", "b", "c"]))?;
    let with_file = gate.validate_before_reconstruction("script", 2, 0, 0);

    assert!(with_file.overall_valid);
    assert!(with_file.summary.warnings.is_empty());
    assert_eq!(with_file.files_validated[&FileKind::Duplicates].translation_count, 3);
    assert_eq!(with_file.summary.total_found, 2);

    Ok(())
}

/// Test that nested output folders are used when no flat folder matches
#[test]
fn test_gate_withNestedLayout_shouldValidateNestedFiles() -> Result<()> {
    common::init_test_logging();
    let root = common::create_temp_dir()?;
    common::create_flat_output(root.path(), "OtherGame")?;
    let dir = common::create_nested_output(root.path(), "MyGame", "chapter1")?;
    common::create_test_file(&dir, "chapter1_dialogue.txt", &common::dialogue_content(4))?;

    let gate = ReconstructionGate::new(root.path());
    let location = gate.locate_output("chapter1").expect("output folder should be found");
    let result = gate.validate_before_reconstruction("chapter1", 4, 0, 0);

    assert_eq!(location.translate_dir, dir);
    assert!(result.overall_valid, "errors: {:?}", result.summary.errors);

    Ok(())
}

/// Test that a temp root without any translate folder fails fast with a single error
#[test]
fn test_gate_withoutTranslateFolder_shouldFailFast() -> Result<()> {
    common::init_test_logging();
    let root = common::create_temp_dir()?;
    common::create_test_file(
        &root.path().join("MyGame").join("fichiers_a_ne_pas_traduire"),
        "script_empty.txt",
        "\n",
    )?;

    let result = ReconstructionGate::new(root.path()).validate_before_reconstruction("script", 2, 0, 1);

    assert!(!result.overall_valid);
    assert!(result.files_validated.is_empty());
    assert_eq!(result.summary.files_checked, 0);
    assert_eq!(result.summary.errors.len(), 1);
    assert!(result.summary.errors[0].contains("No output folder"));

    Ok(())
}
