#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use cyp1a2_snps::tools::{CommandRunner, Invocation, ToolOutput};
use cyp1a2_snps::Result;

/// Compare `actual` byte-for-byte against `tests/snapshots/<name>`.
///
/// Line terminators are part of the comparison. With `CYP1A2_BLESS` set the
/// golden file is rewritten instead.
pub fn check_golden(name: &str, actual: &str) {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/snapshots")
        .join(name);

    if std::env::var_os("CYP1A2_BLESS").is_some() {
        let parent = path.parent().expect("golden file has a parent directory");
        fs::create_dir_all(parent).expect("create golden directory");
        fs::write(&path, actual).expect("write golden file");
        return;
    }

    let expected = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("cannot read golden file {}: {err}", path.display()));
    if expected == actual {
        return;
    }

    let mut expected_lines = expected.split_inclusive('\n');
    let mut actual_lines = actual.split_inclusive('\n');
    for line in 1.. {
        match (expected_lines.next(), actual_lines.next()) {
            (Some(want), Some(got)) if want == got => continue,
            (want, got) => panic!(
                "{} differs at line {line}\n  expected: {want:?}\n  actual:   {got:?}\nrerun with CYP1A2_BLESS=1 to accept",
                path.display()
            ),
        }
    }
}

pub const VCF_HEADER: &str = "##fileformat=VCFv4.2\n##SnpEffVersion=\"5.1\"\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tSAMPLE\n";

/// Stands in for samtools, bcftools, snpEff, bgzip and tabix.
///
/// Redirected outputs are created as empty files, `bcftools view` queries are
/// answered from `records` keyed by region string, and any command whose
/// rendered line contains `fail_on` exits with status 1.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    pub workdir: PathBuf,
    pub records: HashMap<String, String>,
    pub fail_on: Option<String>,
    pub query_exit_code: i32,
    pub commands: Vec<String>,
}

impl ScriptedRunner {
    pub fn new(workdir: &Path) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
            ..Self::default()
        }
    }

    pub fn with_record(mut self, position: &str, line: &str) -> Self {
        self.records.insert(position.to_string(), line.to_string());
        self
    }

    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_string());
        self
    }

    pub fn queries(&self) -> Vec<&String> {
        self.commands
            .iter()
            .filter(|command| command.contains(" view CYP1A2_annotated.vcf.gz "))
            .collect()
    }

    fn respond(&mut self, invocation: &Invocation, rendered: String) -> ToolOutput {
        if self
            .fail_on
            .as_deref()
            .is_some_and(|needle| rendered.contains(needle))
        {
            return ToolOutput::failed(rendered, 1, "scripted failure");
        }

        if let Some(path) = &invocation.stdout {
            fs::write(self.workdir.join(path), b"").expect("create redirected output");
        }

        if invocation.has_arg("view") && !invocation.has_arg("-b") {
            let position = invocation
                .args
                .last()
                .map(|arg| arg.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut stdout = VCF_HEADER.to_string();
            if let Some(line) = self.records.get(&position) {
                stdout.push_str(line);
                stdout.push('\n');
            }
            let mut output = ToolOutput::ok(rendered, stdout);
            if self.query_exit_code != 0 {
                output.success = false;
                output.code = Some(self.query_exit_code);
            }
            return output;
        }

        ToolOutput::ok(rendered, Vec::new())
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<ToolOutput> {
        let rendered = invocation.to_string();
        self.commands.push(rendered.clone());
        Ok(self.respond(invocation, rendered))
    }

    fn run_piped(&mut self, upstream: &Invocation, downstream: &Invocation) -> Result<ToolOutput> {
        let rendered = format!("{upstream} | {downstream}");
        self.commands.push(rendered.clone());
        Ok(self.respond(downstream, rendered))
    }
}

/// Working directory holding an empty `seq.cram`.
pub fn workdir_with_input() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(dir.path().join("seq.cram"), b"").expect("create input");
    dir
}
