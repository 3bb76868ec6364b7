//! Destinations for output units. A unit is one `.j` file; the sink hands
//! out a writer per unit and knows how to install the runtime classes.

use std::{
    cell::RefCell,
    collections::BTreeMap,
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    rc::Rc,
};

use crate::backend::runtime::{self, RuntimeAsset};

pub trait OutputSink {
    /// Creates (or truncates) the unit for class `name`
    fn create_unit(&mut self, name: &str) -> io::Result<Box<dyn Write>>;

    /// Copies the fixed runtime support classes next to the generated units
    fn install_runtime(&mut self) -> io::Result<()>;
}

/// Writes each unit to `<directory>/<name>.j`
#[derive(Debug)]
pub struct OutputDirectory {
    path: PathBuf,
}

impl OutputDirectory {
    /// Creates the directory if needed and removes anything already inside it
    pub fn prepare(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();

        fs::create_dir_all(&path)?;

        for entry in fs::read_dir(&path)? {
            let entry = entry?;

            if entry.file_type()?.is_dir() {
                fs::remove_dir_all(entry.path())?;
            } else {
                fs::remove_file(entry.path())?;
            }
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn unit_path(&self, name: &str) -> PathBuf {
        self.path.join(format!("{name}.j"))
    }
}

impl OutputSink for OutputDirectory {
    fn create_unit(&mut self, name: &str) -> io::Result<Box<dyn Write>> {
        let file = File::create(self.unit_path(name))?;

        Ok(Box::new(BufWriter::new(file)))
    }

    fn install_runtime(&mut self) -> io::Result<()> {
        for asset in runtime::ASSETS {
            fs::write(self.path.join(asset.file_name()), asset.source)?;
        }

        Ok(())
    }
}

/// Keeps every unit in memory, keyed by class name
#[derive(Debug, Default, Clone)]
pub struct MemoryOutput {
    units: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unit(&self, name: &str) -> Option<String> {
        self.units.borrow().get(name).cloned()
    }

    pub fn unit_names(&self) -> Vec<String> {
        self.units.borrow().keys().cloned().collect()
    }
}

impl OutputSink for MemoryOutput {
    fn create_unit(&mut self, name: &str) -> io::Result<Box<dyn Write>> {
        self.units.borrow_mut().insert(name.to_owned(), String::new());

        Ok(Box::new(MemoryUnitWriter {
            name: name.to_owned(),
            units: Rc::clone(&self.units),
        }))
    }

    fn install_runtime(&mut self) -> io::Result<()> {
        let mut units = self.units.borrow_mut();

        for RuntimeAsset { class_name, source } in runtime::ASSETS {
            units.insert((*class_name).to_owned(), (*source).to_owned());
        }

        Ok(())
    }
}

struct MemoryUnitWriter {
    name: String,
    units: Rc<RefCell<BTreeMap<String, String>>>,
}

impl Write for MemoryUnitWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = std::str::from_utf8(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        self.units
            .borrow_mut()
            .entry(self.name.clone())
            .or_default()
            .push_str(text);

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_clears_previous_contents() {
        let temp = mktemp::Temp::new_dir().unwrap();
        let root = temp.to_path_buf();

        fs::write(root.join("Stale.j"), "old").unwrap();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("nested").join("Inner.j"), "old").unwrap();

        let output = OutputDirectory::prepare(&root).unwrap();

        assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
    }

    #[test]
    fn prepare_creates_missing_directory() {
        let temp = mktemp::Temp::new_dir().unwrap();
        let root = temp.to_path_buf().join("out");

        let output = OutputDirectory::prepare(&root).unwrap();

        assert!(output.path().is_dir());
    }

    #[test]
    fn directory_units_and_runtime_land_on_disk() {
        let temp = mktemp::Temp::new_dir().unwrap();
        let mut output = OutputDirectory::prepare(temp.to_path_buf()).unwrap();

        let mut writer = output.create_unit("Point").unwrap();
        writer.write_all(b".class public Point\n").unwrap();
        writer.flush().unwrap();
        drop(writer);

        output.install_runtime().unwrap();

        assert_eq!(
            fs::read_to_string(output.unit_path("Point")).unwrap(),
            ".class public Point\n"
        );
        assert_eq!(
            fs::read_to_string(output.path().join("List.j")).unwrap(),
            runtime::LIST.source
        );
        assert_eq!(
            fs::read_to_string(output.path().join("Fptr.j")).unwrap(),
            runtime::FPTR.source
        );
    }

    #[test]
    fn memory_units_accumulate_writes() {
        let mut output = MemoryOutput::new();
        let mut writer = output.create_unit("Main").unwrap();

        writer.write_all(b"first\n").unwrap();
        writer.write_all(b"second\n").unwrap();

        assert_eq!(output.unit("Main").unwrap(), "first\nsecond\n");
        assert_eq!(output.unit_names(), vec!["Main".to_owned()]);
    }
}
