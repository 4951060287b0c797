use super::ids::{LigandId, ProteinId};
use super::ligand::{Ligand, LigandVariant};
use super::particle::Particle;
use super::protein::Protein;
use nalgebra::Point2;
use rand::Rng;
use slotmap::SlotMap;
use thiserror::Error;

/// Errors raised when a binding operation would break the protein/ligand relationship.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("Protein {0:?} does not exist in the system")]
    UnknownProtein(ProteinId),

    #[error("Ligand {0:?} does not exist in the system")]
    UnknownLigand(LigandId),

    #[error("Protein {protein:?} is already occupied by ligand {occupant:?}")]
    SlotOccupied {
        protein: ProteinId,
        occupant: LigandId,
    },

    #[error("Ligand {ligand:?} is already bound to protein {protein:?}")]
    AlreadyBound {
        ligand: LigandId,
        protein: ProteinId,
    },

    #[error("Binding references are inconsistent: {0}")]
    Inconsistent(String),
}

/// Number of proteins whose slot is held by each ligand species.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundCounts {
    pub normal: usize,
    pub competitor: usize,
}

impl BoundCounts {
    pub fn total(&self) -> usize {
        self.normal + self.competitor
    }
}

/// Owns every particle of a simulation.
///
/// Proteins and ligands are stored by value in slot maps and refer to each other through
/// generational ids, so removing a particle can never leave a dangling reference behind.
/// Alongside each slot map the system keeps an insertion-ordered id list; every iteration
/// the engine performs follows these lists, which makes the binding scan order fixed and
/// reproducible.
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    /// Primary storage for proteins.
    proteins: SlotMap<ProteinId, Protein>,
    /// Primary storage for ligands of both species.
    ligands: SlotMap<LigandId, Ligand>,
    /// Proteins in insertion order.
    protein_order: Vec<ProteinId>,
    /// Normal ligands in insertion order.
    normal_order: Vec<LigandId>,
    /// Competitor ligands in insertion order.
    competitor_order: Vec<LigandId>,
}

impl ParticleSystem {
    /// Creates an empty system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves a protein by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The protein ID to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&Protein)` if the protein exists, otherwise `None`.
    pub fn protein(&self, id: ProteinId) -> Option<&Protein> {
        self.proteins.get(id)
    }

    /// Retrieves a mutable reference to a protein by its ID.
    ///
    /// Only the kinematic state is writable from outside the crate; the binding slot is
    /// managed by [`bind`](Self::bind) and [`release`](Self::release).
    pub fn protein_mut(&mut self, id: ProteinId) -> Option<&mut Protein> {
        self.proteins.get_mut(id)
    }

    /// Retrieves a ligand by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The ligand ID to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&Ligand)` if the ligand exists, otherwise `None`.
    pub fn ligand(&self, id: LigandId) -> Option<&Ligand> {
        self.ligands.get(id)
    }

    /// Retrieves a mutable reference to a ligand by its ID.
    pub fn ligand_mut(&mut self, id: LigandId) -> Option<&mut Ligand> {
        self.ligands.get_mut(id)
    }

    /// Protein IDs in insertion order.
    pub fn protein_ids(&self) -> &[ProteinId] {
        &self.protein_order
    }

    /// Ligand IDs of one species in insertion order.
    pub fn ligand_ids(&self, variant: LigandVariant) -> &[LigandId] {
        match variant {
            LigandVariant::Normal => &self.normal_order,
            LigandVariant::Competitor => &self.competitor_order,
        }
    }

    /// All ligand IDs in processing order: normal ligands first, then competitors.
    pub fn all_ligand_ids(&self) -> impl Iterator<Item = LigandId> + '_ {
        self.normal_order
            .iter()
            .chain(self.competitor_order.iter())
            .copied()
    }

    /// Returns an iterator over proteins in insertion order.
    ///
    /// # Return
    ///
    /// An iterator yielding `(ProteinId, &Protein)` pairs.
    pub fn proteins_iter(&self) -> impl Iterator<Item = (ProteinId, &Protein)> {
        self.protein_order
            .iter()
            .filter_map(move |&id| self.proteins.get(id).map(|protein| (id, protein)))
    }

    /// Returns an iterator over all ligands in processing order.
    ///
    /// # Return
    ///
    /// An iterator yielding `(LigandId, &Ligand)` pairs, normal ligands first.
    pub fn ligands_iter(&self) -> impl Iterator<Item = (LigandId, &Ligand)> {
        self.all_ligand_ids()
            .filter_map(move |id| self.ligands.get(id).map(|ligand| (id, ligand)))
    }

    /// Returns an iterator over the kinematic state of every particle.
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.proteins
            .values()
            .map(|protein| &protein.particle)
            .chain(self.ligands.values().map(|ligand| &ligand.particle))
    }

    pub fn protein_count(&self) -> usize {
        self.protein_order.len()
    }

    pub fn ligand_count(&self, variant: LigandVariant) -> usize {
        self.ligand_ids(variant).len()
    }

    pub fn is_empty(&self) -> bool {
        self.proteins.is_empty() && self.ligands.is_empty()
    }

    /// Adds a free protein at the given position.
    ///
    /// # Return
    ///
    /// The ID of the new protein. It is appended to the end of the protein order.
    pub fn add_protein(&mut self, position: Point2<f64>) -> ProteinId {
        let id = self.proteins.insert(Protein::new(position));
        self.protein_order.push(id);
        id
    }

    /// Adds a free ligand of the given species at the given position.
    ///
    /// # Return
    ///
    /// The ID of the new ligand. It is appended to the end of its species' order.
    pub fn add_ligand(&mut self, variant: LigandVariant, position: Point2<f64>) -> LigandId {
        let id = self.ligands.insert(Ligand::new(variant, position));
        self.order_for_mut(variant).push(id);
        id
    }

    /// Binds a free ligand to a protein with a free slot.
    ///
    /// Both sides of the relationship are written together. The ligand is moved onto the
    /// protein's centre.
    ///
    /// # Errors
    ///
    /// Returns a [`BindingError`] if either ID is stale, the protein's slot is already
    /// occupied, or the ligand is already bound elsewhere. The system is left unchanged.
    pub fn bind(&mut self, ligand_id: LigandId, protein_id: ProteinId) -> Result<(), BindingError> {
        let protein = self
            .proteins
            .get_mut(protein_id)
            .ok_or(BindingError::UnknownProtein(protein_id))?;
        let ligand = self
            .ligands
            .get_mut(ligand_id)
            .ok_or(BindingError::UnknownLigand(ligand_id))?;

        if let Some(occupant) = protein.bound_ligand {
            return Err(BindingError::SlotOccupied {
                protein: protein_id,
                occupant,
            });
        }
        if let Some(current) = ligand.bound_to {
            return Err(BindingError::AlreadyBound {
                ligand: ligand_id,
                protein: current,
            });
        }

        protein.bound_ligand = Some(ligand_id);
        ligand.bound_to = Some(protein_id);
        ligand.particle.position = protein.particle.position;
        Ok(())
    }

    /// Releases a ligand from its protein.
    ///
    /// The protein's slot is cleared and the ligand is placed just outside contact distance
    /// with an outward kick (see [`Ligand::detach_from`]). Releasing a free ligand is a no-op.
    ///
    /// # Return
    ///
    /// Returns the ID of the protein the ligand was released from, or `None` if it was free.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::UnknownLigand`] for a stale ID, and
    /// [`BindingError::Inconsistent`] if the two sides of the binding disagree.
    pub fn release<R: Rng + ?Sized>(
        &mut self,
        ligand_id: LigandId,
        rng: &mut R,
    ) -> Result<Option<ProteinId>, BindingError> {
        let ligand = self
            .ligands
            .get_mut(ligand_id)
            .ok_or(BindingError::UnknownLigand(ligand_id))?;
        let Some(protein_id) = ligand.bound_to else {
            return Ok(None);
        };

        let protein = self
            .proteins
            .get_mut(protein_id)
            .filter(|protein| protein.bound_ligand == Some(ligand_id))
            .ok_or_else(|| {
                BindingError::Inconsistent(format!(
                    "ligand {:?} points at protein {:?}, which does not hold it",
                    ligand_id, protein_id
                ))
            })?;

        protein.bound_ligand = None;
        ligand.detach_from(&protein.particle, rng);
        Ok(Some(protein_id))
    }

    /// Removes a protein from the system.
    ///
    /// A ligand bound to the protein is released first, so it is free and positioned just
    /// outside the protein's former location afterwards.
    ///
    /// # Return
    ///
    /// Returns the removed protein and the ligand it released, if any; `None` if the ID was
    /// stale.
    pub fn remove_protein<R: Rng + ?Sized>(
        &mut self,
        protein_id: ProteinId,
        rng: &mut R,
    ) -> Result<Option<(Protein, Option<LigandId>)>, BindingError> {
        let Some(bound) = self.proteins.get(protein_id).map(|p| p.bound_ligand) else {
            return Ok(None);
        };

        if let Some(ligand_id) = bound {
            self.release(ligand_id, rng)?;
        }

        self.protein_order.retain(|&id| id != protein_id);
        Ok(self.proteins.remove(protein_id).map(|protein| (protein, bound)))
    }

    /// Removes a ligand from the system, clearing its protein's slot if it was bound.
    ///
    /// # Return
    ///
    /// Returns `Some(Ligand)` if the ligand existed and was removed, otherwise `None`.
    pub fn remove_ligand(&mut self, ligand_id: LigandId) -> Option<Ligand> {
        let ligand = self.ligands.remove(ligand_id)?;

        if let Some(protein) = ligand
            .bound_to
            .and_then(|protein_id| self.proteins.get_mut(protein_id))
        {
            if protein.bound_ligand == Some(ligand_id) {
                protein.bound_ligand = None;
            }
        }

        self.order_for_mut(ligand.variant)
            .retain(|&id| id != ligand_id);
        Some(ligand)
    }

    /// Removes every particle.
    pub fn clear(&mut self) {
        self.proteins.clear();
        self.ligands.clear();
        self.protein_order.clear();
        self.normal_order.clear();
        self.competitor_order.clear();
    }

    /// Counts the proteins occupied by each ligand species.
    pub fn bound_counts(&self) -> BoundCounts {
        let mut counts = BoundCounts::default();
        for protein in self.proteins.values() {
            let variant = protein
                .bound_ligand
                .and_then(|id| self.ligands.get(id))
                .map(|ligand| ligand.variant);
            match variant {
                Some(LigandVariant::Normal) => counts.normal += 1,
                Some(LigandVariant::Competitor) => counts.competitor += 1,
                None => {}
            }
        }
        counts
    }

    /// Verifies that every binding is recorded on both sides and every order list matches
    /// its storage.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::Inconsistent`] describing the first violation found.
    pub fn check_binding_consistency(&self) -> Result<(), BindingError> {
        for (protein_id, protein) in self.proteins.iter() {
            if let Some(ligand_id) = protein.bound_ligand {
                let back_reference = self.ligands.get(ligand_id).and_then(|l| l.bound_to);
                if back_reference != Some(protein_id) {
                    return Err(BindingError::Inconsistent(format!(
                        "protein {:?} holds ligand {:?}, whose back reference is {:?}",
                        protein_id, ligand_id, back_reference
                    )));
                }
            }
        }

        for (ligand_id, ligand) in self.ligands.iter() {
            if let Some(protein_id) = ligand.bound_to {
                let slot = self.proteins.get(protein_id).and_then(|p| p.bound_ligand);
                if slot != Some(ligand_id) {
                    return Err(BindingError::Inconsistent(format!(
                        "ligand {:?} is bound to protein {:?}, whose slot holds {:?}",
                        ligand_id, protein_id, slot
                    )));
                }
            }
            if !self.ligand_ids(ligand.variant).contains(&ligand_id) {
                return Err(BindingError::Inconsistent(format!(
                    "ligand {:?} is missing from the {} order",
                    ligand_id, ligand.variant
                )));
            }
        }

        if self.protein_order.len() != self.proteins.len()
            || self.normal_order.len() + self.competitor_order.len() != self.ligands.len()
        {
            return Err(BindingError::Inconsistent(
                "order lists do not match particle storage".to_string(),
            ));
        }

        Ok(())
    }

    fn order_for_mut(&mut self, variant: LigandVariant) -> &mut Vec<LigandId> {
        match variant {
            LigandVariant::Normal => &mut self.normal_order,
            LigandVariant::Competitor => &mut self.competitor_order,
        }
    }
}
