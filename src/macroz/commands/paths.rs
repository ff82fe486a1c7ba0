use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::MacroBackend;

pub fn run<B: MacroBackend>(backend: &B) -> Result<CmdResult> {
    Ok(CmdResult::default().with_paths(vec![backend.location()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fs::FileBackend;
    use std::path::PathBuf;

    #[test]
    fn reports_backing_file() {
        let backend = FileBackend::new("/tmp/macroz/macros.json");
        let result = run(&backend).unwrap();
        assert_eq!(result.paths, vec![PathBuf::from("/tmp/macroz/macros.json")]);
    }
}
