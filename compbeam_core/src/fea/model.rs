//! Frame model container and linear static analysis

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::elements::{DistributedLoad, LoadCombo, LoadDirection, Material, Member, Node, Section, Support};
use super::error::{FeaError, FeaResult};
use super::math::{self, Mat, Vec12, Vector};

/// A 3D frame model solved by the direct stiffness method.
///
/// Collections are ordered maps so DOF numbering, and therefore results, are
/// reproducible run to run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameModel {
    pub nodes: BTreeMap<String, Node>,
    pub materials: BTreeMap<String, Material>,
    pub sections: BTreeMap<String, Section>,
    pub members: BTreeMap<String, Member>,
    pub supports: BTreeMap<String, Support>,
    pub member_dist_loads: BTreeMap<String, Vec<DistributedLoad>>,
    pub load_combos: BTreeMap<String, LoadCombo>,

    /// Nodal displacements by combination, then node
    #[serde(skip)]
    node_displacements: HashMap<String, BTreeMap<String, [f64; 6]>>,

    #[serde(skip)]
    analyzed: bool,
}

impl FrameModel {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Model Building Methods
    // ========================

    pub fn add_node(&mut self, name: &str, node: Node) -> FeaResult<()> {
        if self.nodes.contains_key(name) {
            return Err(FeaError::DuplicateName(name.to_string()));
        }
        self.nodes.insert(name.to_string(), node);
        self.analyzed = false;
        Ok(())
    }

    pub fn add_material(&mut self, name: &str, material: Material) -> FeaResult<()> {
        if self.materials.contains_key(name) {
            return Err(FeaError::DuplicateName(name.to_string()));
        }
        if !(material.e > 0.0 && material.g > 0.0) {
            return Err(FeaError::InvalidInput(format!(
                "material '{}' needs positive E and G",
                name
            )));
        }
        self.materials.insert(name.to_string(), material);
        Ok(())
    }

    pub fn add_section(&mut self, name: &str, section: Section) -> FeaResult<()> {
        if self.sections.contains_key(name) {
            return Err(FeaError::DuplicateName(name.to_string()));
        }
        if !(section.a > 0.0 && section.iy > 0.0 && section.iz > 0.0 && section.j > 0.0) {
            return Err(FeaError::InvalidInput(format!(
                "section '{}' needs positive A, Iy, Iz and J",
                name
            )));
        }
        self.sections.insert(name.to_string(), section);
        Ok(())
    }

    pub fn add_member(&mut self, name: &str, member: Member) -> FeaResult<()> {
        if !self.nodes.contains_key(&member.i_node) {
            return Err(FeaError::NodeNotFound(member.i_node.clone()));
        }
        if !self.nodes.contains_key(&member.j_node) {
            return Err(FeaError::NodeNotFound(member.j_node.clone()));
        }
        if !self.materials.contains_key(&member.material) {
            return Err(FeaError::MaterialNotFound(member.material.clone()));
        }
        if !self.sections.contains_key(&member.section) {
            return Err(FeaError::SectionNotFound(member.section.clone()));
        }
        if self.members.contains_key(name) {
            return Err(FeaError::DuplicateName(name.to_string()));
        }
        self.members.insert(name.to_string(), member);
        self.analyzed = false;
        Ok(())
    }

    pub fn add_support(&mut self, node_name: &str, support: Support) -> FeaResult<()> {
        if !self.nodes.contains_key(node_name) {
            return Err(FeaError::NodeNotFound(node_name.to_string()));
        }
        self.supports.insert(node_name.to_string(), support);
        self.analyzed = false;
        Ok(())
    }

    pub fn add_member_dist_load(&mut self, member_name: &str, load: DistributedLoad) -> FeaResult<()> {
        if !self.members.contains_key(member_name) {
            return Err(FeaError::MemberNotFound(member_name.to_string()));
        }
        if !(load.w.is_finite() && load.x1 >= 0.0 && load.x1 < load.x2) {
            return Err(FeaError::InvalidInput(format!(
                "distributed load on '{}' needs finite w and 0 <= x1 < x2",
                member_name
            )));
        }
        self.member_dist_loads
            .entry(member_name.to_string())
            .or_default()
            .push(load);
        self.analyzed = false;
        Ok(())
    }

    pub fn add_load_combo(&mut self, combo: LoadCombo) -> FeaResult<()> {
        if self.load_combos.contains_key(&combo.name) {
            return Err(FeaError::DuplicateName(combo.name));
        }
        self.load_combos.insert(combo.name.clone(), combo);
        self.analyzed = false;
        Ok(())
    }

    // ========================
    // Analysis
    // ========================

    /// Run linear static analysis for every load combination.
    pub fn analyze_linear(&mut self) -> FeaResult<()> {
        if self.load_combos.is_empty() {
            return Err(FeaError::InvalidInput("model has no load combinations".to_string()));
        }

        self.prepare_model()?;
        let (k_global, dof_map) = self.build_global_stiffness()?;
        let (free_dofs, k11) = self.partition(&k_global, &dof_map)?;
        debug!(
            "Frame model: {} nodes, {} members, {} free DOFs",
            self.nodes.len(),
            self.members.len(),
            free_dofs.len()
        );

        self.node_displacements.clear();
        let combo_names: Vec<String> = self.load_combos.keys().cloned().collect();
        for combo_name in &combo_names {
            let p_global = self.build_load_vector(combo_name, &dof_map)?;
            let p1 = Vector::from_iterator(free_dofs.len(), free_dofs.iter().map(|&d| p_global[d]));
            let d1 = math::solve_linear_system(&k11, &p1)?;

            let mut d_full = Vector::zeros(self.nodes.len() * 6);
            for (i, &dof) in free_dofs.iter().enumerate() {
                d_full[dof] = d1[i];
            }

            let displacements = dof_map
                .iter()
                .map(|(name, &base)| {
                    let mut d = [0.0; 6];
                    d.copy_from_slice(&d_full.as_slice()[base..base + 6]);
                    (name.clone(), d)
                })
                .collect();
            self.node_displacements.insert(combo_name.clone(), displacements);

            self.calculate_member_forces(combo_name)?;
        }

        self.analyzed = true;
        info!("Linear analysis complete for {} combination(s)", combo_names.len());
        Ok(())
    }

    fn prepare_model(&mut self) -> FeaResult<()> {
        for member in self.members.values_mut() {
            let i_node = self
                .nodes
                .get(&member.i_node)
                .ok_or_else(|| FeaError::NodeNotFound(member.i_node.clone()))?;
            let j_node = self
                .nodes
                .get(&member.j_node)
                .ok_or_else(|| FeaError::NodeNotFound(member.j_node.clone()))?;
            let length = i_node.distance_to(j_node);
            if length < 1e-10 {
                return Err(FeaError::InvalidGeometry(format!(
                    "Member has zero length: i={}, j={}",
                    member.i_node, member.j_node
                )));
            }
            member.length = Some(length);
            member.local_forces.clear();
            member.local_displacements.clear();
        }
        Ok(())
    }

    /// Geometry, local stiffness and transformation of one member.
    fn member_matrices(&self, member: &Member) -> FeaResult<(f64, math::Mat12, math::Mat12)> {
        let i_node = self
            .nodes
            .get(&member.i_node)
            .ok_or_else(|| FeaError::NodeNotFound(member.i_node.clone()))?;
        let j_node = self
            .nodes
            .get(&member.j_node)
            .ok_or_else(|| FeaError::NodeNotFound(member.j_node.clone()))?;
        let material = self
            .materials
            .get(&member.material)
            .ok_or_else(|| FeaError::MaterialNotFound(member.material.clone()))?;
        let section = self
            .sections
            .get(&member.section)
            .ok_or_else(|| FeaError::SectionNotFound(member.section.clone()))?;
        let length = member.length.ok_or(FeaError::NotAnalyzed)?;

        let k_local = math::member_local_stiffness(
            material.e, material.g, section.a, section.iy, section.iz, section.j, length,
        );
        let t = math::member_transformation_matrix(&i_node.coords(), &j_node.coords())?;
        Ok((length, k_local, t))
    }

    fn build_global_stiffness(&self) -> FeaResult<(Mat, BTreeMap<String, usize>)> {
        let n_dofs = self.nodes.len() * 6;
        let mut k_global = Mat::zeros(n_dofs, n_dofs);

        let dof_map: BTreeMap<String, usize> = self
            .nodes
            .keys()
            .enumerate()
            .map(|(i, name)| (name.clone(), i * 6))
            .collect();

        for member in self.members.values() {
            let (_, k_local, t) = self.member_matrices(member)?;
            let k_member = t.transpose() * k_local * t;

            let ends = [dof_map[&member.i_node], dof_map[&member.j_node]];
            for (a_end, &a_dof) in ends.iter().enumerate() {
                for (b_end, &b_dof) in ends.iter().enumerate() {
                    for a in 0..6 {
                        for b in 0..6 {
                            k_global[(a_dof + a, b_dof + b)] += k_member[(a_end * 6 + a, b_end * 6 + b)];
                        }
                    }
                }
            }
        }

        Ok((k_global, dof_map))
    }

    /// Free DOFs and the matching stiffness sub-matrix K11.
    fn partition(&self, k_global: &Mat, dof_map: &BTreeMap<String, usize>) -> FeaResult<(Vec<usize>, Mat)> {
        let mut free_dofs = Vec::new();
        for (name, &base) in dof_map {
            let restraints = self.supports.get(name).map(|s| s.as_array()).unwrap_or([false; 6]);
            free_dofs.extend((0..6).filter(|i| !restraints[*i]).map(|i| base + i));
        }

        if free_dofs.is_empty() {
            return Err(FeaError::AnalysisFailed("No free degrees of freedom".to_string()));
        }
        if !self.supports.values().any(Support::is_supported) {
            return Err(FeaError::Unstable("model has no supports".to_string()));
        }

        let n_free = free_dofs.len();
        let k11 = Mat::from_fn(n_free, n_free, |i, j| k_global[(free_dofs[i], free_dofs[j])]);
        Ok((free_dofs, k11))
    }

    /// Fixed-end reactions (local) of every distributed load on a member under a combination.
    fn member_fer(&self, member_name: &str, combo: &LoadCombo, length: f64) -> Vec12 {
        let mut fer = Vec12::zeros();
        for load in self.member_dist_loads.get(member_name).into_iter().flatten() {
            let factor = combo.factor(&load.case);
            if factor.abs() < 1e-10 {
                continue;
            }
            fer += math::fer_uniform_load(factor * load.w, load.x1, load.x2, length, load.direction.index());
        }
        fer
    }

    fn build_load_vector(&self, combo_name: &str, dof_map: &BTreeMap<String, usize>) -> FeaResult<Vector> {
        let combo = self
            .load_combos
            .get(combo_name)
            .ok_or_else(|| FeaError::LoadCombinationNotFound(combo_name.to_string()))?;

        let mut p = Vector::zeros(self.nodes.len() * 6);
        for (member_name, member) in &self.members {
            let (length, _, t) = self.member_matrices(member)?;
            let fer_global = t.transpose() * self.member_fer(member_name, combo, length);

            let i_dof = dof_map[&member.i_node];
            let j_dof = dof_map[&member.j_node];
            for i in 0..6 {
                p[i_dof + i] -= fer_global[i];
                p[j_dof + i] -= fer_global[i + 6];
            }
        }
        Ok(p)
    }

    /// Member end forces: F = K·d + FER, in local coordinates.
    fn calculate_member_forces(&mut self, combo_name: &str) -> FeaResult<()> {
        let combo = self
            .load_combos
            .get(combo_name)
            .ok_or_else(|| FeaError::LoadCombinationNotFound(combo_name.to_string()))?;
        let displacements = self.node_displacements.get(combo_name).ok_or(FeaError::NotAnalyzed)?;

        let mut results = Vec::with_capacity(self.members.len());
        for (member_name, member) in &self.members {
            let (length, k_local, t) = self.member_matrices(member)?;
            let d_i = displacements.get(&member.i_node).ok_or(FeaError::NotAnalyzed)?;
            let d_j = displacements.get(&member.j_node).ok_or(FeaError::NotAnalyzed)?;

            let d_global = Vec12::from_iterator(d_i.iter().chain(d_j.iter()).copied());
            let d_local = t * d_global;
            let f_local = k_local * d_local + self.member_fer(member_name, combo, length);

            let mut forces = [0.0; 12];
            forces.copy_from_slice(f_local.as_slice());
            let mut local_d = [0.0; 12];
            local_d.copy_from_slice(d_local.as_slice());
            results.push((member_name.clone(), forces, local_d));
        }

        for (member_name, forces, local_d) in results {
            if let Some(member) = self.members.get_mut(&member_name) {
                member.local_forces.insert(combo_name.to_string(), forces);
                member.local_displacements.insert(combo_name.to_string(), local_d);
            }
        }
        Ok(())
    }

    // ========================
    // Results
    // ========================

    pub fn is_analyzed(&self) -> bool {
        self.analyzed
    }

    pub fn combo_names(&self) -> Vec<String> {
        self.load_combos.keys().cloned().collect()
    }

    /// Global displacements [DX, DY, DZ, RX, RY, RZ] of a node
    pub fn node_displacement(&self, node_name: &str, combo_name: &str) -> FeaResult<[f64; 6]> {
        self.check_analyzed(combo_name)?;
        self.node_displacements
            .get(combo_name)
            .and_then(|d| d.get(node_name))
            .copied()
            .ok_or_else(|| FeaError::NodeNotFound(node_name.to_string()))
    }

    /// Local end forces of a member
    pub fn member_local_forces(&self, member_name: &str, combo_name: &str) -> FeaResult<[f64; 12]> {
        Ok(self.member_state(member_name, combo_name)?.forces)
    }

    /// Bending moment about local z at `x`, positive when sagging (tension in local -y fibres).
    pub fn member_moment_z(&self, member_name: &str, x: f64, combo_name: &str) -> FeaResult<f64> {
        let state = self.member_state(member_name, combo_name)?;
        let x = state.clamp(x);
        let f = &state.forces;
        let mut m = f[1] * x - f[5];
        for (w, x1, x2) in &state.loads {
            if x > *x1 {
                let b = x.min(*x2);
                m += w * ((x - x1).powi(2) - (x - b).powi(2)) / 2.0;
            }
        }
        Ok(m)
    }

    /// Shear in local y at `x` (left-segment resultant, positive up).
    pub fn member_shear_y(&self, member_name: &str, x: f64, combo_name: &str) -> FeaResult<f64> {
        let state = self.member_state(member_name, combo_name)?;
        let x = state.clamp(x);
        let mut v = state.forces[1];
        for (w, x1, x2) in &state.loads {
            if x > *x1 {
                v += w * (x.min(*x2) - x1);
            }
        }
        Ok(v)
    }

    /// Transverse displacement in local y at `x`.
    ///
    /// Integrates EI·v'' = M(x) in closed form from the i-end displacement
    /// and rotation.
    pub fn member_deflection_y(&self, member_name: &str, x: f64, combo_name: &str) -> FeaResult<f64> {
        let state = self.member_state(member_name, combo_name)?;
        let x = state.clamp(x);
        let f = &state.forces;
        let d = &state.displacements;

        let macaulay4 = |a: f64| if x > a { (x - a).powi(4) } else { 0.0 };
        let mut ei_v = f[1] * x.powi(3) / 6.0 - f[5] * x * x / 2.0;
        for (w, x1, x2) in &state.loads {
            ei_v += w / 24.0 * (macaulay4(*x1) - macaulay4(*x2));
        }
        Ok(d[1] + d[5] * x + ei_v / state.ei_z)
    }

    /// Moment, shear or deflection sampled at `n` evenly spaced points (local x).
    pub fn member_diagram(
        &self,
        member_name: &str,
        combo_name: &str,
        n: usize,
        quantity: Quantity,
    ) -> FeaResult<(Vec<f64>, Vec<f64>)> {
        let length = self.member_state(member_name, combo_name)?.length;
        let n = n.max(2);
        let xs: Vec<f64> = (0..n).map(|i| length * i as f64 / (n - 1) as f64).collect();
        let values = xs
            .iter()
            .map(|&x| match quantity {
                Quantity::Moment => self.member_moment_z(member_name, x, combo_name),
                Quantity::Shear => self.member_shear_y(member_name, x, combo_name),
                Quantity::Deflection => self.member_deflection_y(member_name, x, combo_name),
            })
            .collect::<FeaResult<Vec<f64>>>()?;
        Ok((xs, values))
    }

    fn check_analyzed(&self, combo_name: &str) -> FeaResult<()> {
        if !self.analyzed {
            return Err(FeaError::NotAnalyzed);
        }
        if !self.load_combos.contains_key(combo_name) {
            return Err(FeaError::LoadCombinationNotFound(combo_name.to_string()));
        }
        Ok(())
    }

    fn member_state(&self, member_name: &str, combo_name: &str) -> FeaResult<MemberState> {
        self.check_analyzed(combo_name)?;
        let member = self
            .members
            .get(member_name)
            .ok_or_else(|| FeaError::MemberNotFound(member_name.to_string()))?;
        let combo = &self.load_combos[combo_name];
        let forces = *member.local_forces.get(combo_name).ok_or(FeaError::NotAnalyzed)?;
        let displacements = *member.local_displacements.get(combo_name).ok_or(FeaError::NotAnalyzed)?;
        let length = member.length.ok_or(FeaError::NotAnalyzed)?;
        let material = self
            .materials
            .get(&member.material)
            .ok_or_else(|| FeaError::MaterialNotFound(member.material.clone()))?;
        let section = self
            .sections
            .get(&member.section)
            .ok_or_else(|| FeaError::SectionNotFound(member.section.clone()))?;

        let loads = self
            .member_dist_loads
            .get(member_name)
            .into_iter()
            .flatten()
            .filter(|l| l.direction == LoadDirection::Fy)
            .map(|l| (combo.factor(&l.case) * l.w, l.x1.max(0.0), l.x2.min(length)))
            .filter(|(w, x1, x2)| w.abs() > 0.0 && x2 > x1)
            .collect();

        Ok(MemberState {
            forces,
            displacements,
            length,
            ei_z: material.e * section.iz,
            loads,
        })
    }
}

/// Result quantity for [`FrameModel::member_diagram`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Moment,
    Shear,
    Deflection,
}

/// Solved state of one member under one combination
struct MemberState {
    forces: [f64; 12],
    displacements: [f64; 12],
    length: f64,
    ei_z: f64,
    /// Factored local-y loads (w, x1, x2)
    loads: Vec<(f64, f64, f64)>,
}

impl MemberState {
    fn clamp(&self, x: f64) -> f64 {
        x.clamp(0.0, self.length)
    }
}
