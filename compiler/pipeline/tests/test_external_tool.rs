#![cfg(unix)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use pipeline::{
    Command, Directives, ExternalToolInvoker, FsProbe, PipelineError, PipelineOrchestrator,
    PipelineValidator,
};

fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path).expect("tool metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("chmod tool");
}

/// POSIX shell converter: logs each call, fails for archives named `fail_stem`,
/// otherwise writes `<destination>/<stem>.uml`.
fn fake_emf2xmi(dir: &Path, log: &Path, fail_stem: &str) -> PathBuf {
    let tool = dir.join("emf2xmi");
    let mut f = fs::File::create(&tool).expect("create tool");
    writeln!(f, "#!/bin/sh").expect("write tool");
    writeln!(f, "archive=\"${{1#project_file=}}\"").expect("write tool");
    writeln!(f, "dest=\"${{2#destination_dir=}}\"").expect("write tool");
    writeln!(f, "stem=$(basename \"$archive\" .mdzip)").expect("write tool");
    writeln!(f, "echo \"$stem\" >> {}", log.display()).expect("write tool");
    writeln!(f, "if [ \"$stem\" = \"{fail_stem}\" ]; then exit 7; fi").expect("write tool");
    writeln!(
        f,
        "printf '<uml:Model xmlns:uml=\"http://www.eclipse.org/uml2/5.0.0/UML\" name=\"%s\"/>' \"$stem\" > \"$dest/$stem.uml\""
    )
    .expect("write tool");
    drop(f);
    make_executable(&tool);
    tool
}

#[test]
fn test_second_of_three_archives_fails_fast() {
    let temp = tempfile::tempdir().expect("Failed to create temporary directory");
    let archives = temp.path().join("archives");
    fs::create_dir_all(&archives).expect("create archives");
    for name in ["A", "B", "C"] {
        fs::write(archives.join(format!("{name}.mdzip")), "").expect("write archive");
    }
    let log = temp.path().join("calls.txt");
    let tool = fake_emf2xmi(temp.path(), &log, "B");
    let modane_dir = temp.path().join("modane");

    let directives = Directives {
        mdzip: vec![archives.join("A.mdzip"), archives.join("B.mdzip"), archives.join("C.mdzip")],
        uml_dir: Some(temp.path().join("uml")),
        modane_dir: Some(modane_dir.clone()),
        ..Directives::default()
    };
    let plan = PipelineValidator::new(&FsProbe)
        .validate(Command::GenerateModane, &directives)
        .expect("valid directives");

    let result =
        PipelineOrchestrator::new(plan).with_converter(ExternalToolInvoker::new(tool)).run();

    match result {
        Err(PipelineError::ConversionFailed { archive, exit_code }) => {
            assert_eq!(archive, archives.join("B.mdzip"));
            assert_eq!(exit_code, 7);
        }
        other => panic!("Expected ConversionFailed, got {:?}", other),
    }
    assert_eq!(fs::read_to_string(&log).expect("read log"), "A\nB\n");
    assert!(temp.path().join("uml/A/A.uml").is_file());
    assert!(!temp.path().join("uml/C").exists());
    assert!(!modane_dir.exists());
}

#[test]
fn test_successful_conversion_feeds_transformation() {
    let temp = tempfile::tempdir().expect("Failed to create temporary directory");
    let archive = temp.path().join("Mesh.mdzip");
    fs::write(&archive, "").expect("write archive");
    let log = temp.path().join("calls.txt");
    let tool = fake_emf2xmi(temp.path(), &log, "none");

    let directives = Directives {
        mdzip: vec![archive],
        uml_dir: Some(temp.path().join("uml")),
        modane_dir: Some(temp.path().join("modane")),
        ..Directives::default()
    };
    let plan = PipelineValidator::new(&FsProbe)
        .validate(Command::GenerateModane, &directives)
        .expect("valid directives");
    let report = PipelineOrchestrator::new(plan)
        .with_converter(ExternalToolInvoker::new(tool))
        .run()
        .expect("run");

    assert_eq!(report.converted, vec![temp.path().join("uml/Mesh/Mesh.uml")]);
    assert_eq!(report.written_models, vec![temp.path().join("modane/Mesh.m")]);
    let text = fs::read_to_string(temp.path().join("modane/Mesh.m")).expect("read model");
    assert!(text.contains("package Mesh;"));
}
