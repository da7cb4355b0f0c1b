//! Planning the directory tree of an environment.
//!
//! Planning never touches the filesystem beyond resolving the interpreter;
//! [`crate::provision`] creates what the plan describes.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::interpreter::{ExecutableCheck, Interpreter, InterpreterError, InterpreterResolver, PythonVersion, VersionProbe};
use crate::platform::Platform;
use crate::platform::os::Os;

/// Directory layout of one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
  pub root: PathBuf,
  pub lib_dir: PathBuf,
  pub include_dir: PathBuf,
  pub bin_dir: PathBuf,
  pub site_packages: PathBuf,
  /// `lib64` link pointing at `lib`, on 64-bit Linux only
  pub lib64_link: Option<PathBuf>,
}

impl Layout {
  /// Derive the layout for `root` on `platform`.
  ///
  /// - POSIX: `bin`, `lib/pythonX.Y`, `include/pythonX.Y`
  /// - Windows: `Scripts`, `Lib`, `Include`
  ///
  /// A relative `root` is made absolute against the current directory
  /// without consulting the filesystem.
  pub fn new(root: &Path, version: PythonVersion, platform: Platform) -> Self {
    let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());

    if platform.os == Os::Windows {
      let lib_dir = root.join("Lib");
      return Self {
        site_packages: lib_dir.join("site-packages"),
        include_dir: root.join("Include"),
        bin_dir: root.join("Scripts"),
        lib_dir,
        lib64_link: None,
        root,
      };
    }

    let versioned = format!("python{version}");
    let lib_dir = root.join("lib").join(&versioned);
    Self {
      site_packages: lib_dir.join("site-packages"),
      include_dir: root.join("include").join(&versioned),
      bin_dir: root.join("bin"),
      lib_dir,
      lib64_link: platform.wants_lib64_link().then(|| root.join("lib64")),
      root,
    }
  }
}

/// Everything needed to materialize an environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionPlan {
  pub layout: Layout,
  pub interpreter: Interpreter,
  pub platform: Platform,
  /// Unversioned interpreter entry point, e.g. `bin/python`
  pub primary: PathBuf,
  /// Versioned entry points equivalent to `primary`, e.g. `bin/python3`, `bin/python3.11`
  pub aliases: Vec<PathBuf>,
}

impl ProvisionPlan {
  /// The primary executable followed by every alias.
  pub fn executables(&self) -> impl Iterator<Item = &Path> {
    std::iter::once(self.primary.as_path()).chain(self.aliases.iter().map(PathBuf::as_path))
  }
}

/// File names of the interpreter entry points: unversioned, major, major.minor.
pub fn executable_names(version: PythonVersion, os: Os) -> [String; 3] {
  let suffix = if os.is_windows() { ".exe" } else { "" };
  [
    format!("python{suffix}"),
    format!("python{}{suffix}", version.major),
    format!("python{}.{}{suffix}", version.major, version.minor),
  ]
}

/// Plans environments for one platform.
pub struct LayoutPlanner<'a, C, P> {
  resolver: &'a InterpreterResolver<C>,
  probe: &'a P,
  platform: Platform,
}

impl<'a, C: ExecutableCheck, P: VersionProbe> LayoutPlanner<'a, C, P> {
  pub fn new(resolver: &'a InterpreterResolver<C>, probe: &'a P, platform: Platform) -> Self {
    Self {
      resolver,
      probe,
      platform,
    }
  }

  /// Resolve `requested` and plan an environment rooted at `target_root`.
  ///
  /// # Errors
  ///
  /// Interpreter resolution and version probing errors are returned unchanged.
  pub fn plan(&self, target_root: &Path, requested: &str) -> Result<ProvisionPlan, InterpreterError> {
    let spec = self.resolver.resolve(requested)?;
    let version = self.probe.probe(&spec.path)?;
    let interpreter = Interpreter { spec, version };

    let layout = Layout::new(target_root, version, self.platform);
    let [primary, aliases @ ..] = executable_names(version, self.platform.os).map(|name| layout.bin_dir.join(name));

    info!(
      root = %layout.root.display(),
      interpreter = %interpreter.path().display(),
      %version,
      "planned environment"
    );

    Ok(ProvisionPlan {
      layout,
      interpreter,
      platform: self.platform,
      primary,
      aliases: aliases.to_vec(),
    })
  }
}
