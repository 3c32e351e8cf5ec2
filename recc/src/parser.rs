//! Classifies an argv as a compiler command, rewrites its paths for remote
//! execution, extracts the declared output products, and synthesizes the
//! dependency-discovery command that runs locally.

use std::collections::BTreeSet;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::config::Config;
use crate::errors::Result;
use crate::pathutil;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompilerFlavor {
    Gcc,
    Clang,
    SunStudio,
    XlcAix,
}

fn flavor_of(basename: &str) -> Option<CompilerFlavor> {
    match basename {
        "gcc" | "g++" | "c++" => Some(CompilerFlavor::Gcc),
        "clang" | "clang++" => Some(CompilerFlavor::Clang),
        "CC" | "cc" | "c89" | "c99" => Some(CompilerFlavor::SunStudio),
        "xlc" | "xlc++" | "xlC" | "xlCcore" | "xlc++core" => Some(CompilerFlavor::XlcAix),
        _ => None,
    }
}

/// How an option in a compiler's table is treated by the scanner.
#[derive(Clone, Copy)]
enum Kind {
    /// Exact-match option that would corrupt dependency output; kept in the
    /// remote command, dropped from the deps command.
    Interferes,
    /// Option with a gcc-style value (separate token or fused); the value is
    /// an output product.
    OutputGcc,
    /// `option=value` form; the value is an output product.
    OutputEq,
    /// Option with a gcc-style value naming an input search path; the value
    /// is rewritten and the option is kept in the deps command.
    InputGcc,
    /// `option=value` form naming an input search path.
    InputEq,
    /// Exact-match option marking this as a compile step.
    Compile,
    /// The command cannot run remotely at all.
    Unsupported,
    /// `option=value` form that cannot run remotely.
    UnsupportedEq,
}

type Table = &'static [(&'static str, Kind)];

const GCC_OPTIONS: Table = &[
    ("-M", Kind::Interferes),
    ("-MD", Kind::Interferes),
    ("-MMD", Kind::Interferes),
    ("-MM", Kind::Interferes),
    ("-MG", Kind::Interferes),
    ("-MP", Kind::Interferes),
    ("-MV", Kind::Interferes),
    ("-o", Kind::OutputGcc),
    ("-MF", Kind::OutputGcc),
    ("-MT", Kind::OutputGcc),
    ("-MQ", Kind::OutputGcc),
    ("-include", Kind::InputGcc),
    ("-imacros", Kind::InputGcc),
    ("-I", Kind::InputGcc),
    ("-iquote", Kind::InputGcc),
    ("-isystem", Kind::InputGcc),
    ("-idirafter", Kind::InputGcc),
    ("-iprefix", Kind::InputGcc),
    ("-isysroot", Kind::InputGcc),
    ("--sysroot", Kind::InputEq),
    ("-c", Kind::Compile),
];

/// Options that may appear inside `-Wp,`/`-Xpreprocessor` groups. `-MD` and
/// `-MMD` take a file argument here, unlike in the driver's own table.
const GCC_PREPROCESSOR_OPTIONS: Table = &[
    ("-M", Kind::Interferes),
    ("-MM", Kind::Interferes),
    ("-MG", Kind::Interferes),
    ("-MP", Kind::Interferes),
    ("-MV", Kind::Interferes),
    ("-o", Kind::OutputGcc),
    ("-MF", Kind::OutputGcc),
    ("-MT", Kind::OutputGcc),
    ("-MQ", Kind::OutputGcc),
    ("-MD", Kind::OutputGcc),
    ("-MMD", Kind::OutputGcc),
    ("-include", Kind::InputGcc),
    ("-imacros", Kind::InputGcc),
    ("-I", Kind::InputGcc),
    ("-iquote", Kind::InputGcc),
    ("-isystem", Kind::InputGcc),
    ("-idirafter", Kind::InputGcc),
    ("-iprefix", Kind::InputGcc),
    ("-isysroot", Kind::InputGcc),
    ("--sysroot", Kind::InputEq),
];

const SUN_OPTIONS: Table = &[
    ("-xM", Kind::Interferes),
    ("-xM1", Kind::Interferes),
    ("-xMD", Kind::Interferes),
    ("-xMMD", Kind::Interferes),
    ("-o", Kind::OutputGcc),
    ("-xMF", Kind::OutputGcc),
    ("-xtemp", Kind::OutputEq),
    ("-I", Kind::InputGcc),
    ("-include", Kind::InputGcc),
    ("-c", Kind::Compile),
    ("-xpch", Kind::UnsupportedEq),
    ("-xprofile", Kind::UnsupportedEq),
    ("-###", Kind::Unsupported),
];

const AIX_OPTIONS: Table = &[
    ("-qmakedep", Kind::Interferes),
    ("-qmakedep=gcc", Kind::Interferes),
    ("-M", Kind::Interferes),
    ("-qsyntaxonly", Kind::Interferes),
    ("-MF", Kind::OutputGcc),
    ("-o", Kind::OutputGcc),
    ("-qexpfile", Kind::OutputEq),
    ("-qcinc", Kind::InputEq),
    ("-I", Kind::InputGcc),
    ("-qinclude", Kind::InputEq),
    ("-c", Kind::Compile),
    ("-#", Kind::Unsupported),
    ("-qshowpdf", Kind::Unsupported),
    ("-qdump_class_hierarchy", Kind::Unsupported),
];

/// The result of classifying and rewriting an argv. When
/// [ParsedCommand::is_compiler_command] is false the remaining fields hold
/// the untouched input.
pub struct ParsedCommand {
    compiler_command: bool,
    flavor: Option<CompilerFlavor>,
    arguments: Vec<String>,
    deps_arguments: Vec<String>,
    products: BTreeSet<String>,
    produces_sun_make_rules: bool,
    /// On AIX the dependency output lands in a temporary file whose lifetime
    /// matches this command's; the file is removed on drop.
    aix_deps_file: Option<NamedTempFile>,
}

impl ParsedCommand {
    pub fn parse(command: &[String], working_directory: &str, config: &Config) -> Result<Self> {
        let flavor = command
            .first()
            .and_then(|arg0| detect_flavor(arg0));

        let Some(flavor) = flavor else {
            return Ok(Self::not_a_compiler(command));
        };

        let ctx = RewriteContext {
            working_directory,
            config,
        };

        let table = match flavor {
            CompilerFlavor::Gcc | CompilerFlavor::Clang => GCC_OPTIONS,
            CompilerFlavor::SunStudio => SUN_OPTIONS,
            CompilerFlavor::XlcAix => AIX_OPTIONS,
        };
        let allow_preprocessor_groups =
            matches!(flavor, CompilerFlavor::Gcc | CompilerFlavor::Clang);

        let mut arguments = command.to_vec();
        let mut scan = Scan::default();
        if !scan_options(table, &mut arguments, &mut scan, &ctx, allow_preprocessor_groups) {
            return Ok(Self::not_a_compiler(command));
        }

        // Re-attach any -Wp,/-Xpreprocessor options, rewritten through the
        // preprocessor's own table.
        if !scan.preprocessor_options.is_empty() {
            let mut prepro = std::mem::take(&mut scan.preprocessor_options);
            let mut prepro_scan = Scan::default();
            scan_options(GCC_PREPROCESSOR_OPTIONS, &mut prepro, &mut prepro_scan, &ctx, false);
            scan.products.extend(prepro_scan.products);
            for arg in prepro {
                arguments.push("-Xpreprocessor".to_string());
                arguments.push(arg);
            }
            for arg in prepro_scan.deps {
                scan.deps.push("-Xpreprocessor".to_string());
                scan.deps.push(arg);
            }
        }

        let mut produces_sun_make_rules = false;
        let mut aix_deps_file = None;
        match flavor {
            CompilerFlavor::Gcc => {
                scan.deps.push("-M".to_string());
            }
            CompilerFlavor::Clang => {
                scan.deps.push("-M".to_string());
                scan.deps.push("-Qunused-arguments".to_string());
                if config.deps_global_paths {
                    // Clang reports where it found crt objects on stderr
                    // with this flag.
                    scan.deps.push("-v".to_string());
                }
            }
            CompilerFlavor::SunStudio => {
                scan.deps.push("-xM1".to_string());
                produces_sun_make_rules = true;
            }
            CompilerFlavor::XlcAix => {
                let file = tempfile::Builder::new()
                    .prefix("recc")
                    .tempfile_in(&config.tmpdir)?;
                scan.deps.push("-E".to_string());
                scan.deps.push("-M".to_string());
                scan.deps.push("-MF".to_string());
                scan.deps.push(file.path().to_string_lossy().into_owned());
                produces_sun_make_rules = true;
                aix_deps_file = Some(file);
            }
        }

        Ok(ParsedCommand {
            compiler_command: scan.is_compile,
            flavor: Some(flavor),
            arguments,
            deps_arguments: scan.deps,
            products: scan.products,
            produces_sun_make_rules,
            aix_deps_file,
        })
    }

    fn not_a_compiler(command: &[String]) -> Self {
        ParsedCommand {
            compiler_command: false,
            flavor: None,
            arguments: command.to_vec(),
            deps_arguments: Vec::new(),
            products: BTreeSet::new(),
            produces_sun_make_rules: false,
            aix_deps_file: None,
        }
    }

    pub fn is_compiler_command(&self) -> bool {
        self.compiler_command
    }

    pub fn flavor(&self) -> Option<CompilerFlavor> {
        self.flavor
    }

    pub fn is_clang(&self) -> bool {
        self.flavor == Some(CompilerFlavor::Clang)
    }

    /// The argv to send to the remote worker, with paths rewritten.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// The locally-run command whose output names this command's inputs.
    pub fn dependencies_command(&self) -> &[String] {
        &self.deps_arguments
    }

    pub fn products(&self) -> &BTreeSet<String> {
        &self.products
    }

    pub fn produces_sun_make_rules(&self) -> bool {
        self.produces_sun_make_rules
    }

    pub fn aix_deps_file_path(&self) -> Option<&Path> {
        self.aix_deps_file.as_ref().map(|f| f.path())
    }
}

/// Strips the directory, a `_r` thread-safe suffix, and a trailing version
/// (digits, dots, dashes), so `/usr/bin/gcc-4.7` becomes `gcc` and
/// `./xlc++_r` becomes `xlc++`.
pub fn command_basename(path: &str) -> &str {
    let basename = path.rsplit('/').next().unwrap_or(path);
    let mut end = basename.len();
    let bytes = basename.as_bytes();
    if end > 2 && bytes[end - 2..] == *b"_r" {
        end -= 2;
    } else if end > 3 && bytes[end - 3..end - 1] == *b"_r" {
        end -= 3;
    }
    while end > 0 {
        let c = bytes[end - 1];
        if c.is_ascii_digit() || c == b'.' || c == b'-' {
            end -= 1;
        } else {
            break;
        }
    }
    &basename[..end]
}

/// Exact basenames win over version-stripped ones, so `c99` is found in the
/// compiler table rather than truncated to `c`.
fn detect_flavor(arg0: &str) -> Option<CompilerFlavor> {
    let basename = arg0.rsplit('/').next().unwrap_or(arg0);
    flavor_of(basename).or_else(|| flavor_of(command_basename(arg0)))
}

struct RewriteContext<'a> {
    working_directory: &'a str,
    config: &'a Config,
}

impl RewriteContext<'_> {
    /// Absolute paths under the project root become relative to the working
    /// directory; everything else passes through.
    fn relative_if_absolute(&self, arg: &str) -> String {
        if arg.starts_with('/') {
            pathutil::make_relative(arg, self.working_directory, &self.config.project_root)
        } else {
            arg.to_string()
        }
    }

    fn prefix_mapped(&self, arg: &str) -> String {
        pathutil::resolve_prefix_map(arg, &self.config.prefix_replacement)
    }

    /// The final form an argument takes in the remote command: prefix-mapped
    /// for hermeticity, then made relative.
    fn remote_form(&self, arg: &str) -> String {
        self.relative_if_absolute(&self.prefix_mapped(arg))
    }
}

#[derive(Default)]
struct Scan {
    deps: Vec<String>,
    products: BTreeSet<String>,
    is_compile: bool,
    preprocessor_options: Vec<String>,
}

/// Walks the argv against a compiler's option table, rewriting `command` in
/// place and filling `scan`. Returns false if an unsupported option makes
/// the whole command non-remotable.
fn scan_options(
    table: Table,
    command: &mut Vec<String>,
    scan: &mut Scan,
    ctx: &RewriteContext<'_>,
    allow_preprocessor_groups: bool,
) -> bool {
    let mut i = 0;
    'token: while i < command.len() {
        let token = command[i].clone();

        if allow_preprocessor_groups {
            if let Some(list) = token.strip_prefix("-Wp,") {
                command.remove(i);
                parse_stage_option_list(list, &mut scan.preprocessor_options);
                continue 'token;
            }
            if token == "-Xpreprocessor" {
                command.remove(i);
                if i < command.len() {
                    let value = command.remove(i);
                    scan.preprocessor_options.push(value);
                }
                continue 'token;
            }
        }

        for (name, kind) in table {
            match kind {
                Kind::Interferes => {
                    if token == *name {
                        i += 1;
                        continue 'token;
                    }
                }
                Kind::Compile => {
                    if token == *name {
                        scan.deps.push(token);
                        scan.is_compile = true;
                        i += 1;
                        continue 'token;
                    }
                }
                Kind::Unsupported => {
                    if token == *name {
                        return false;
                    }
                }
                Kind::UnsupportedEq => {
                    if token == *name || is_eq_form(&token, name) {
                        return false;
                    }
                }
                Kind::OutputGcc => {
                    if token == *name {
                        if i + 1 < command.len() {
                            let value = ctx.relative_if_absolute(&command[i + 1]);
                            command[i + 1] = value.clone();
                            scan.products.insert(value);
                            i += 2;
                        } else {
                            i += 1;
                        }
                        continue 'token;
                    }
                    if let Some(value) = token.strip_prefix(*name) {
                        let value = ctx.relative_if_absolute(value);
                        command[i] = format!("{}{}", name, value);
                        scan.products.insert(value);
                        i += 1;
                        continue 'token;
                    }
                }
                Kind::OutputEq => {
                    if token == *name {
                        i += 1;
                        continue 'token;
                    }
                    if is_eq_form(&token, name) {
                        let value = ctx.relative_if_absolute(&token[name.len() + 1..]);
                        command[i] = format!("{}={}", name, value);
                        if !value.is_empty() {
                            scan.products.insert(value);
                        }
                        i += 1;
                        continue 'token;
                    }
                }
                Kind::InputGcc => {
                    if token == *name {
                        if i + 1 < command.len() {
                            let original = command[i + 1].clone();
                            command[i + 1] = ctx.relative_if_absolute(&original);
                            scan.deps.push(command[i].clone());
                            scan.deps.push(command[i + 1].clone());
                            command[i + 1] = ctx.remote_form(&original);
                            i += 2;
                        } else {
                            i += 1;
                        }
                        continue 'token;
                    }
                    if let Some(value) = token.strip_prefix(*name) {
                        let original = value.to_string();
                        command[i] = format!("{}{}", name, ctx.relative_if_absolute(&original));
                        scan.deps.push(command[i].clone());
                        command[i] = format!("{}{}", name, ctx.remote_form(&original));
                        i += 1;
                        continue 'token;
                    }
                }
                Kind::InputEq => {
                    if token == *name {
                        scan.deps.push(token);
                        i += 1;
                        continue 'token;
                    }
                    if is_eq_form(&token, name) {
                        let original = token[name.len() + 1..].to_string();
                        command[i] = format!("{}={}", name, ctx.relative_if_absolute(&original));
                        scan.deps.push(command[i].clone());
                        command[i] = format!("{}={}", name, ctx.remote_form(&original));
                        i += 1;
                        continue 'token;
                    }
                }
            }
        }

        // Any other token: source file, regular flag, the compiler itself.
        scan.deps.push(ctx.relative_if_absolute(&token));
        command[i] = ctx.remote_form(&token);
        i += 1;
    }
    true
}

fn is_eq_form(token: &str, name: &str) -> bool {
    token.len() > name.len() + 1 && token.starts_with(name) && token.as_bytes()[name.len()] == b'='
}

/// Splits a `-Wp,`-style comma-separated list, honoring single quotes.
fn parse_stage_option_list(list: &str, result: &mut Vec<String>) {
    let mut quoted = false;
    let mut current = String::new();
    for c in list.chars() {
        match c {
            '\'' => quoted = !quoted,
            ',' if !quoted => result.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    result.push(current);
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn parse(list: &[&str], cwd: &str, config: &Config) -> ParsedCommand {
        ParsedCommand::parse(&args(list), cwd, config).unwrap()
    }

    fn project_config(root: &str) -> Config {
        Config {
            project_root: root.to_string(),
            ..Config::default()
        }
    }

    #[test_case("gcc", Some(CompilerFlavor::Gcc))]
    #[test_case("g++", Some(CompilerFlavor::Gcc))]
    #[test_case("/usr/bin/gcc-4.7", Some(CompilerFlavor::Gcc))]
    #[test_case("clang++-9", Some(CompilerFlavor::Clang))]
    #[test_case("CC", Some(CompilerFlavor::SunStudio) ; "CC_uppercase")]
    #[test_case("cc", Some(CompilerFlavor::SunStudio) ; "cc_lowercase")]
    #[test_case("c99", Some(CompilerFlavor::SunStudio))]
    #[test_case("./xlc++_r", Some(CompilerFlavor::XlcAix))]
    #[test_case("xlC", Some(CompilerFlavor::XlcAix))]
    #[test_case("ld", None)]
    #[test_case("echo", None)]
    fn flavor_detection(arg0: &str, want: Option<CompilerFlavor>) {
        assert_eq!(detect_flavor(arg0), want);
    }

    #[test_case("gcc-4.7", "gcc")]
    #[test_case("/usr/local/bin/g++", "g++")]
    #[test_case("xlc++_r", "xlc++")]
    #[test_case("clang-10", "clang")]
    fn basenames(path: &str, want: &str) {
        assert_eq!(command_basename(path), want);
    }

    #[test]
    fn simple_compile() {
        let cfg = project_config("/proj");
        let p = parse(&["gcc", "-c", "hello.cpp", "-o", "hello.o"], "/proj", &cfg);
        assert!(p.is_compiler_command());
        assert_eq!(p.flavor(), Some(CompilerFlavor::Gcc));
        assert_eq!(p.arguments(), args(&["gcc", "-c", "hello.cpp", "-o", "hello.o"]));
        assert_eq!(p.dependencies_command(), args(&["gcc", "-c", "hello.cpp", "-M"]));
        assert_eq!(
            p.products().iter().cloned().collect::<Vec<_>>(),
            vec!["hello.o"]
        );
        assert!(!p.produces_sun_make_rules());
    }

    #[test]
    fn fused_output_option() {
        let cfg = project_config("/proj");
        let p = parse(&["gcc", "-c", "x.c", "-ohello.o"], "/proj", &cfg);
        assert!(p.products().contains("hello.o"));
    }

    #[test]
    fn preprocessing_only_is_not_a_compile() {
        let cfg = project_config("/proj");
        let p = parse(&["gcc", "-E", "x.c"], "/proj", &cfg);
        assert!(!p.is_compiler_command());
    }

    #[test]
    fn absolute_include_paths_are_rewritten() {
        let cfg = project_config("/proj");
        let p = parse(
            &["gcc", "-I", "/proj/include", "-c", "/proj/src/x.c"],
            "/proj/src",
            &cfg,
        );
        assert_eq!(
            p.arguments(),
            args(&["gcc", "-I", "../include", "-c", "x.c"])
        );
        assert_eq!(
            p.dependencies_command(),
            args(&["gcc", "-I", "../include", "-c", "x.c", "-M"])
        );
    }

    #[test]
    fn sysroot_equals_form() {
        let cfg = project_config("/proj");
        let p = parse(&["gcc", "--sysroot=/proj/sys", "-c", "x.c"], "/proj", &cfg);
        assert!(p.arguments().contains(&"--sysroot=sys".to_string()));
    }

    #[test]
    fn system_includes_outside_root_are_untouched() {
        let cfg = project_config("/proj");
        let p = parse(&["gcc", "-I", "/usr/include", "-c", "x.c"], "/proj", &cfg);
        assert!(p.arguments().contains(&"/usr/include".to_string()));
    }

    #[test]
    fn prefix_map_applies_to_remote_command_only() {
        let mut cfg = project_config("/proj");
        cfg.prefix_replacement = vec![("/usr/local".to_string(), "/opt".to_string())];
        let p = parse(&["gcc", "-I/usr/local/include", "-c", "x.c"], "/proj", &cfg);
        // The remote command sees the hermetic path...
        assert!(p.arguments().contains(&"-I/opt/include".to_string()));
        // ...while dependency discovery keeps the real local path.
        assert!(p
            .dependencies_command()
            .contains(&"-I/usr/local/include".to_string()));
    }

    #[test]
    fn clang_deps_command_quiets_unused_arguments() {
        let cfg = project_config("/proj");
        let p = parse(&["clang", "-c", "x.c"], "/proj", &cfg);
        assert!(p.is_clang());
        let deps = p.dependencies_command();
        assert!(deps.contains(&"-M".to_string()));
        assert!(deps.contains(&"-Qunused-arguments".to_string()));
        assert!(!deps.contains(&"-v".to_string()));

        let mut cfg = project_config("/proj");
        cfg.deps_global_paths = true;
        let p = parse(&["clang", "-c", "x.c"], "/proj", &cfg);
        assert!(p.dependencies_command().contains(&"-v".to_string()));
    }

    #[test]
    fn dependency_flags_are_dropped_from_deps_command() {
        let cfg = project_config("/proj");
        let p = parse(&["gcc", "-MMD", "-MF", "x.d", "-c", "x.c"], "/proj", &cfg);
        let deps = p.dependencies_command();
        assert!(!deps.contains(&"-MMD".to_string()));
        assert!(!deps.contains(&"-MF".to_string()));
        assert!(p.products().contains("x.d"));
    }

    #[test]
    fn sun_studio_compile() {
        let cfg = project_config("/proj");
        let p = parse(&["CC", "-c", "foo.c"], "/proj", &cfg);
        assert!(p.is_compiler_command());
        assert!(p.produces_sun_make_rules());
        assert_eq!(
            p.dependencies_command().last().unwrap(),
            &"-xM1".to_string()
        );

        let p = parse(&["cc", "-c", "foo.c"], "/proj", &cfg);
        assert!(p.produces_sun_make_rules());
    }

    #[test]
    fn sun_studio_xtemp_product() {
        let cfg = project_config("/proj");
        let p = parse(&["CC", "-c", "foo.c", "-xtemp=scratch.o"], "/proj", &cfg);
        assert!(p.products().contains("scratch.o"));
    }

    #[test]
    fn sun_studio_unsupported_options() {
        let cfg = project_config("/proj");
        assert!(!parse(&["CC", "-###", "-c", "foo.c"], "/proj", &cfg).is_compiler_command());
        assert!(
            !parse(&["CC", "-xpch=x", "-c", "foo.c"], "/proj", &cfg).is_compiler_command()
        );
    }

    #[test]
    fn aix_deps_file_lifetime() {
        let cfg = project_config("/proj");
        let p = parse(&["xlc", "-c", "foo.c"], "/proj", &cfg);
        assert!(p.is_compiler_command());
        assert!(p.produces_sun_make_rules());

        let deps = p.dependencies_command().to_vec();
        let mf = deps.iter().position(|a| a == "-MF").unwrap();
        assert_eq!(&deps[mf - 2..mf], args(&["-E", "-M"]).as_slice());

        let path = p.aix_deps_file_path().unwrap().to_path_buf();
        assert!(path.exists());
        drop(p);
        assert!(!path.exists());
    }

    #[test]
    fn preprocessor_group_options_are_unwrapped() {
        let cfg = project_config("/proj");
        let p = parse(&["gcc", "-Wp,-MD,x.d", "-c", "x.c"], "/proj", &cfg);
        assert!(p.products().contains("x.d"));
        let cmd = p.arguments().to_vec();
        let pos = cmd.iter().position(|a| a == "-Xpreprocessor").unwrap();
        assert_eq!(&cmd[pos..pos + 4], args(&["-Xpreprocessor", "-MD", "-Xpreprocessor", "x.d"]).as_slice());
    }

    #[test]
    fn non_compiler_commands_pass_through() {
        let cfg = project_config("/proj");
        let p = parse(&["ls", "-l"], "/proj", &cfg);
        assert!(!p.is_compiler_command());
        assert_eq!(p.arguments(), args(&["ls", "-l"]));
        assert!(p.dependencies_command().is_empty());
    }
}
