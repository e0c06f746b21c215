//! Electron scattering form factors.
//!
//! Each chemical element is described by a Gaussian-sum fit: equal-length
//! amplitude (`a`) and squared-width (`b`, in square angstroms) vectors.
//! The voxel builders consume these as `(n_atoms, n_terms)` matrices. A
//! coarse built-in table covers the common organic elements; externally
//! fitted tables load from JSON.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::Array2;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{ExitwaveError, Result};

/// Gaussian-sum fit parameters for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormFactorParams {
    /// Term amplitudes; their sum is the element's total scattering mass.
    pub a: Vec<f64>,
    /// Term squared widths, in square angstroms.
    pub b: Vec<f64>,
}

impl FormFactorParams {
    pub fn new(a: Vec<f64>, b: Vec<f64>) -> Result<Self> {
        if a.is_empty() || a.len() != b.len() {
            return Err(ExitwaveError::invalid(
                "a/b",
                format!(
                    "amplitude and width vectors must be non-empty and equal length, got {} and {}",
                    a.len(),
                    b.len()
                ),
            ));
        }
        Ok(Self { a, b })
    }

    pub fn n_terms(&self) -> usize {
        self.a.len()
    }
}

/// Atomic-number-keyed lookup of scattering parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormFactorTable {
    params: BTreeMap<u32, FormFactorParams>,
}

impl FormFactorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, atomic_number: u32, params: FormFactorParams) {
        self.params.insert(atomic_number, params);
    }

    pub fn lookup(&self, atomic_number: u32) -> Option<&FormFactorParams> {
        self.params.get(&atomic_number)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Assembles the `(n_atoms, n_terms)` amplitude and width matrices for
    /// a sequence of elements, in order.
    ///
    /// Every element must be present in the table and every entry must
    /// share the same term count.
    pub fn params_for_elements(&self, elements: &[u32]) -> Result<(Array2<f64>, Array2<f64>)> {
        if elements.is_empty() {
            return Err(ExitwaveError::invalid(
                "elements",
                "at least one element is required",
            ));
        }

        let mut rows = Vec::with_capacity(elements.len());
        for &z in elements {
            let params = self.lookup(z).ok_or_else(|| {
                ExitwaveError::invalid("elements", format!("no parameters for element {z}"))
            })?;
            rows.push(params);
        }

        let n_terms = rows[0].n_terms();
        if let Some(bad) = rows.iter().find(|p| p.n_terms() != n_terms) {
            return Err(ExitwaveError::invalid(
                "elements",
                format!(
                    "inconsistent term counts: expected {n_terms}, found {}",
                    bad.n_terms()
                ),
            ));
        }

        let ff_a = Array2::from_shape_fn((rows.len(), n_terms), |(i, j)| rows[i].a[j]);
        let ff_b = Array2::from_shape_fn((rows.len(), n_terms), |(i, j)| rows[i].b[j]);
        Ok((ff_a, ff_b))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// Built-in two-term fits for the common organic elements.
///
/// Amplitudes are normalized so each element's terms sum to its electron
/// count; widths are coarse simulation defaults. Production pipelines
/// should load fitted tables via [`FormFactorTable::load_from_file`].
pub static DEFAULT_FORM_FACTORS: Lazy<FormFactorTable> = Lazy::new(|| {
    let entries: [(u32, [f64; 2], [f64; 2]); 7] = [
        (1, [0.55, 0.45], [7.5, 1.9]),    // H
        (2, [1.2, 0.8], [4.2, 1.1]),      // He
        (6, [3.6, 2.4], [5.2, 1.3]),      // C
        (7, [4.2, 2.8], [4.6, 1.15]),     // N
        (8, [4.8, 3.2], [4.0, 1.0]),      // O
        (15, [9.0, 6.0], [3.4, 0.85]),    // P
        (16, [9.6, 6.4], [3.2, 0.8]),     // S
    ];

    let mut table = FormFactorTable::new();
    for (z, a, b) in entries {
        table.insert(z, FormFactorParams {
            a: a.to_vec(),
            b: b.to_vec(),
        });
    }
    table
});

/// Looks elements up in the built-in table, returning the
/// `(n_atoms, n_terms)` matrices the voxel builders take.
pub fn get_form_factor_params(elements: &[u32]) -> Result<(Array2<f64>, Array2<f64>)> {
    DEFAULT_FORM_FACTORS.params_for_elements(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_amplitudes_sum_to_the_electron_count() {
        for (&z, params) in DEFAULT_FORM_FACTORS.params.iter() {
            let total: f64 = params.a.iter().sum();
            assert_relative_eq!(total, z as f64, epsilon = 1e-12);
        }
    }

    #[test]
    fn matrices_follow_element_order() {
        let (ff_a, ff_b) = get_form_factor_params(&[1, 1, 2, 6]).unwrap();
        assert_eq!(ff_a.dim(), (4, 2));
        assert_eq!(ff_b.dim(), (4, 2));
        assert_eq!(ff_a.row(0), ff_a.row(1));
        assert_relative_eq!(ff_a.row(3).sum(), 6.0);
        assert_relative_eq!(ff_b[[2, 0]], 4.2);
    }

    #[test]
    fn unknown_elements_are_reported() {
        let err = get_form_factor_params(&[1, 92]).unwrap_err();
        assert!(err.to_string().contains("92"));
    }

    #[test]
    fn empty_element_lists_are_rejected() {
        assert!(get_form_factor_params(&[]).is_err());
    }

    #[test]
    fn ragged_tables_are_rejected_at_assembly() {
        let mut table = FormFactorTable::new();
        table.insert(1, FormFactorParams::new(vec![1.0], vec![2.0]).unwrap());
        table.insert(
            6,
            FormFactorParams::new(vec![3.0, 3.0], vec![2.0, 1.0]).unwrap(),
        );
        assert!(table.params_for_elements(&[1, 6]).is_err());
    }

    #[test]
    fn params_require_matching_lengths() {
        assert!(FormFactorParams::new(vec![1.0], vec![]).is_err());
        assert!(FormFactorParams::new(vec![], vec![]).is_err());
        assert!(FormFactorParams::new(vec![1.0, 2.0], vec![0.5, 0.7]).is_ok());
    }

    #[test]
    fn tables_round_trip_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form_factors.json");

        DEFAULT_FORM_FACTORS.save_to_file(&path).unwrap();
        let loaded = FormFactorTable::load_from_file(&path).unwrap();
        assert_eq!(&loaded, &*DEFAULT_FORM_FACTORS);
    }
}
