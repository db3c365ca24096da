//! Structure resolution.
//!
//! A structure argument is either a local `.pdb`/`.cif` file or a four character PDB ID.
//! Local files are parsed with pdbtbx; IDs are fetched from the RCSB as mmCIF.
use crate::error::{IoError, Result};
use dmsviz_core::{Structure, ValidationError};
use pdbtbx::PDB;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum::{Display, EnumString};

pub const RCSB_DOWNLOAD_URL: &str = "https://files.rcsb.org/download";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StructureFormat {
    Pdb,
    Cif,
}

impl StructureFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        StructureFormat::from_str(extension).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureInput {
    LocalFile { path: PathBuf, format: StructureFormat },
    RemoteId(String),
}

impl StructureInput {
    /// Decide how to resolve a structure argument.
    ///
    /// An existing file with a structure extension wins over the ID interpretation, so a file
    /// called `6xr8.pdb` is read locally.
    pub fn classify(input: &str) -> std::result::Result<Self, ValidationError> {
        let path = Path::new(input);
        if let Some(format) = StructureFormat::from_path(path) {
            if path.is_file() {
                return Ok(StructureInput::LocalFile {
                    path: path.to_path_buf(),
                    format,
                });
            }
        }
        if input.len() == 4 && input.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Ok(StructureInput::RemoteId(input.to_string()));
        }
        Err(ValidationError::InvalidStructureInput {
            input: input.to_string(),
        })
    }

    /// The value stored in the dataset: file text for local files, the ID otherwise.
    pub fn payload(&self) -> Result<String> {
        match self {
            StructureInput::LocalFile { path, .. } => Ok(fs::read_to_string(path)?),
            StructureInput::RemoteId(id) => Ok(id.clone()),
        }
    }

    /// Parse (and for IDs, download) the structure.
    pub fn load(&self) -> Result<Structure> {
        let pdb = match self {
            StructureInput::LocalFile { path, .. } => open_structure(path)?,
            StructureInput::RemoteId(id) => fetch_rcsb(id)?,
        };
        Ok(Structure::from(&pdb))
    }
}

pub fn open_structure(path: &Path) -> Result<PDB> {
    let structure_error = |errors: Vec<pdbtbx::PDBError>| IoError::Structure {
        path: path.to_path_buf(),
        messages: errors.iter().map(|e| e.to_string()).collect(),
    };
    let (pdb, warnings) = pdbtbx::open(path.to_string_lossy()).map_err(structure_error)?;
    if !warnings.is_empty() {
        tracing::debug!("{} parser warning(s) for {}", warnings.len(), path.display());
    }
    Ok(pdb)
}

/// Download `id` from the RCSB as mmCIF and parse it.
pub fn fetch_rcsb(id: &str) -> Result<PDB> {
    let url = format!("{RCSB_DOWNLOAD_URL}/{}.cif", id.to_uppercase());
    tracing::info!("downloading structure {id} from {url}");
    let response = reqwest::blocking::get(&url)?;
    let status = response.status();
    if status.as_u16() != 200 {
        return Err(ValidationError::StructureFetch {
            id: id.to_string(),
            status: status.as_u16(),
        }
        .into());
    }
    let body = response.text()?;

    let mut temp = tempfile::Builder::new().suffix(".cif").tempfile()?;
    temp.write_all(body.as_bytes())?;
    temp.flush()?;
    open_structure(temp.path())
}
