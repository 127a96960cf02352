use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::cba::{Expenditure, Investment};
use crate::patch::StateUpdate;
use crate::pricing::PriceTable;
use crate::state::GameState;
use crate::types::{Building, Job, Res, Science, Unlock, Upgrade};

// ============================================================================
// Research Tree - sciences, their costs, and what they unlock
// ============================================================================

/// One research entry: its priced cost and the things it unlocks.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
pub struct ScienceInfo {
    pub name: Science,
    pub investment: Investment,
}

impl ScienceInfo {
    pub fn effect(&self, times: f64) -> StateUpdate {
        StateUpdate {
            researched: vec![(self.name, times > 0.0)],
            ..StateUpdate::default()
        }
    }
}

/// The research catalog plus a reverse index from each unlockable thing to
/// the sciences that gate it. Rebuilt per report so costs reflect current
/// prices.
pub struct ScienceIndex {
    pub infos: Vec<ScienceInfo>,
    prerequisite: HashMap<Unlock, Vec<usize>>,
}

impl ScienceIndex {
    pub fn build(prices: &PriceTable) -> Self {
        let mut infos = Vec::new();
        let mut prerequisite: HashMap<Unlock, Vec<usize>> = HashMap::new();

        for (name, cost, unlocks) in science_defs() {
            let mut investment = Investment::new();
            for (res, amount) in cost {
                investment.add(Expenditure::new(amount, res, prices.get(res)));
            }
            let i = infos.len();
            infos.push(ScienceInfo { name, investment });
            for unlock in unlocks {
                prerequisite.entry(unlock).or_default().push(i);
            }
        }

        let index = Self { infos, prerequisite };
        index.assert_acyclic();
        index
    }

    /// The catalog must be a DAG; a cycle would make the resolver loop and
    /// every involved science unreachable. Checked once at build time.
    fn assert_acyclic(&self) {
        let mut done: HashSet<Science> = HashSet::new();
        let mut path: Vec<Science> = Vec::new();
        for info in &self.infos {
            self.visit(info.name, &mut done, &mut path);
        }
    }

    fn visit(&self, name: Science, done: &mut HashSet<Science>, path: &mut Vec<Science>) {
        if done.contains(&name) {
            return;
        }
        assert!(
            !path.contains(&name),
            "cycle in research catalog involving {name:?}"
        );
        path.push(name);
        if let Some(gates) = self.prerequisite.get(&Unlock::Science(name)) {
            for &i in gates {
                self.visit(self.infos[i].name, done, path);
            }
        }
        path.pop();
        done.insert(name);
    }

    /// Unmet research gating `target`, transitively. Dependency-ordered
    /// (prerequisites of a prerequisite come first) and each science appears
    /// exactly once, so a diamond in the tree is not double-charged.
    pub fn missing_prerequisites(&self, state: &GameState, target: Unlock) -> Vec<usize> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.collect_missing(state, target, &mut seen, &mut out);
        out
    }

    fn collect_missing(
        &self,
        state: &GameState,
        target: Unlock,
        seen: &mut HashSet<Science>,
        out: &mut Vec<usize>,
    ) {
        let Some(gates) = self.prerequisite.get(&target) else {
            return;
        };
        for &i in gates {
            let name = self.infos[i].name;
            if state.researched(name) || !seen.insert(name) {
                continue;
            }
            self.collect_missing(state, Unlock::Science(name), seen, out);
            out.push(i);
        }
    }

    /// A science row is shown while it is close enough to matter: at most 3
    /// missing prerequisites away, or already researched with the
    /// show-researched flag on.
    pub fn visible(&self, state: &GameState, i: usize) -> bool {
        let name = self.infos[i].name;
        if state.researched(name) {
            state.show_researched
        } else {
            self.missing_prerequisites(state, Unlock::Science(name)).len() <= 3
        }
    }
}

// ============================================================================
// Catalog data
// ============================================================================

fn science_defs() -> Vec<(Science, Vec<(Res, f64)>, Vec<Unlock>)> {
    use Building as B;
    use Job as J;
    use Res::*;
    use crate::types::Science as S;
    use Upgrade as U;
    let s = Unlock::Science;
    let u = Unlock::Upgrade;
    let b = Unlock::Building;
    let j = Unlock::Job;

    vec![
        (S::Calendar, vec![(Science, 30.0)], vec![s(S::Agriculture)]),
        (
            S::Agriculture,
            vec![(Science, 100.0)],
            vec![s(S::Mining), s(S::Archery), b(B::Barn), j(J::Farmer)],
        ),
        (
            S::Archery,
            vec![(Science, 300.0)],
            vec![s(S::AnimalHusbandry), j(J::Hunter)],
        ),
        (
            S::AnimalHusbandry,
            vec![(Science, 500.0)],
            vec![
                s(S::CivilService),
                s(S::Mathematics),
                s(S::Construction),
                b(B::Pasture),
                b(B::UnicornPasture),
            ],
        ),
        (
            S::Mining,
            vec![(Science, 500.0)],
            vec![s(S::MetalWorking), b(B::Mine), b(B::Workshop), u(U::Bolas)],
        ),
        (
            S::MetalWorking,
            vec![(Science, 900.0)],
            vec![b(B::Smelter), u(U::HuntingArmor)],
        ),
        (S::Mathematics, vec![(Science, 1000.0)], vec![b(B::Academy)]),
        (
            S::Construction,
            vec![(Science, 1300.0)],
            vec![
                s(S::Engineering),
                b(B::LogHouse),
                b(B::Warehouse),
                b(B::LumberMill),
                b(B::Ziggurat),
                u(U::CompositeBow),
                u(U::ReinforcedSaw),
            ],
        ),
        (S::CivilService, vec![(Science, 1500.0)], vec![s(S::Currency)]),
        (
            S::Engineering,
            vec![(Science, 1500.0)],
            vec![s(S::Writing), b(B::Aqueduct)],
        ),
        (S::Currency, vec![(Science, 2200.0)], vec![b(B::TradePost)]),
        (
            S::Writing,
            vec![(Science, 3600.0)],
            vec![s(S::Philosophy), s(S::Machinery), s(S::Steel), b(B::Amphitheatre)],
        ),
        (
            S::Philosophy,
            vec![(Science, 9500.0)],
            vec![s(S::Theology), b(B::Temple)],
        ),
        (
            S::Steel,
            vec![(Science, 12000.0)],
            vec![
                u(U::SteelAxe),
                u(U::ReinforcedWarehouses),
                u(U::CoalFurnace),
                u(U::DeepMining),
                u(U::HighPressureEngine),
                u(U::SteelArmor),
            ],
        ),
        (
            S::Machinery,
            vec![(Science, 15000.0)],
            vec![b(B::Steamworks), u(U::PrintingPress), u(U::Crossbow)],
        ),
        (
            S::Theology,
            vec![(Science, 20000.0), (Manuscript, 35.0)],
            vec![s(S::Astronomy), s(S::Cryptotheology), j(J::Priest)],
        ),
        (
            S::Astronomy,
            vec![(Science, 28000.0), (Manuscript, 65.0)],
            vec![s(S::Navigation), b(B::Observatory)],
        ),
        (
            S::Navigation,
            vec![(Science, 35000.0), (Manuscript, 100.0)],
            vec![
                s(S::Architecture),
                s(S::Physics),
                s(S::Geology),
                b(B::Harbor),
                u(U::TitaniumAxe),
                u(U::ExpandedCargo),
                u(U::Astrolabe),
                u(U::TitaniumReflectors),
            ],
        ),
        (
            S::Architecture,
            vec![(Science, 42000.0), (Compendium, 10.0)],
            vec![s(S::Acoustics), b(B::Mansion), b(B::Mint)],
        ),
        (
            S::Physics,
            vec![(Science, 50000.0), (Compendium, 35.0)],
            vec![
                s(S::Chemistry),
                s(S::Electricity),
                s(S::Metaphysics),
                u(U::SteelSaw),
                u(U::Pyrolysis),
            ],
        ),
        (
            S::Metaphysics,
            vec![(Science, 55000.0), (Unobtainium, 5.0)],
            vec![],
        ),
        (
            S::Chemistry,
            vec![(Science, 60000.0), (Compendium, 50.0)],
            vec![
                b(B::OilWell),
                b(B::Calciner),
                u(U::AlloyAxe),
                u(U::AlloyBarns),
                u(U::AlloyWarehouses),
                u(U::AlloyArmor),
            ],
        ),
        (
            S::Acoustics,
            vec![(Science, 60000.0), (Compendium, 60.0)],
            vec![s(S::DramaAndPoetry), b(B::Chapel)],
        ),
        (
            S::Geology,
            vec![(Science, 65000.0), (Compendium, 65.0)],
            vec![s(S::Biology), b(B::Quarry), u(U::Geodesy), j(J::Geologist)],
        ),
        (
            S::DramaAndPoetry,
            vec![(Science, 90000.0), (Parchment, 5000.0)],
            vec![],
        ),
        (
            S::Electricity,
            vec![(Science, 75000.0), (Compendium, 85.0)],
            vec![s(S::Industrialization), b(B::Magneto)],
        ),
        (
            S::Biology,
            vec![(Science, 85000.0), (Compendium, 100.0)],
            vec![s(S::Biochemistry), b(B::BioLab)],
        ),
        (
            S::Biochemistry,
            vec![(Science, 145000.0), (Compendium, 500.0)],
            vec![s(S::Genetics), u(U::BiofuelProcessing)],
        ),
        (
            S::Genetics,
            vec![(Science, 190000.0), (Compendium, 1500.0)],
            vec![u(U::UnicornSelection), u(U::GMCatnip)],
        ),
        (
            S::Industrialization,
            vec![(Science, 100000.0), (Blueprint, 25.0)],
            vec![
                s(S::Mechanization),
                s(S::Metallurgy),
                s(S::Combustion),
                u(U::Logistics),
            ],
        ),
        (
            S::Mechanization,
            vec![(Science, 115000.0), (Blueprint, 45.0)],
            vec![
                s(S::Electronics),
                b(B::Factory),
                u(U::ConcretePillars),
                u(U::Pumpjack),
            ],
        ),
        (
            S::Combustion,
            vec![(Science, 115000.0), (Blueprint, 45.0)],
            vec![
                s(S::Ecology),
                u(U::OffsetPress),
                u(U::FuelInjectors),
                u(U::OilRefinery),
            ],
        ),
        (
            S::Metallurgy,
            vec![(Science, 125000.0), (Blueprint, 60.0)],
            vec![u(U::ElectrolyticSmelting), u(U::Oxidation), u(U::MiningDrill)],
        ),
        (
            S::Ecology,
            vec![(Science, 125000.0), (Blueprint, 55.0)],
            vec![b(B::SolarFarm)],
        ),
        (
            S::Electronics,
            vec![(Science, 135000.0), (Blueprint, 70.0)],
            vec![
                s(S::Robotics),
                s(S::NuclearFission),
                s(S::Rocketry),
                u(U::Refrigeration),
                u(U::CADsystem),
                u(U::SETI),
                u(U::FactoryLogistics),
                u(U::Telecommunication),
                b(B::BroadcastTower),
                b(B::DataCenter),
            ],
        ),
        (
            S::Robotics,
            vec![(Science, 140000.0), (Blueprint, 80.0)],
            vec![
                s(S::ArtificialIntelligence),
                b(B::HydroPlant),
                u(U::RotaryKiln),
                u(U::RoboticAssistance),
            ],
        ),
        (
            S::ArtificialIntelligence,
            vec![(Science, 250000.0), (Blueprint, 150.0)],
            vec![s(S::QuantumCryptography)],
        ),
        (
            S::NuclearFission,
            vec![(Science, 150000.0), (Blueprint, 100.0)],
            vec![
                s(S::Nanotechnology),
                s(S::ParticlePhysics),
                b(B::Reactor),
                u(U::ReactorVessel),
                u(U::NuclearSmelters),
            ],
        ),
        (
            S::Rocketry,
            vec![(Science, 175000.0), (Blueprint, 125.0)],
            vec![
                s(S::Satellites),
                s(S::OilProcessing),
                u(U::OilDistillation),
                s(S::OrbitalLaunch),
            ],
        ),
        (
            S::OilProcessing,
            vec![(Science, 215000.0), (Blueprint, 150.0)],
            vec![u(U::FactoryProcessing)],
        ),
        (
            S::Satellites,
            vec![(Science, 190000.0), (Blueprint, 125.0)],
            vec![
                s(S::OrbitalEngineering),
                b(B::Satellite),
                u(U::Photolithography),
                u(U::OrbitalGeodesy),
                u(U::Uplink),
                u(U::ThinFilmCells),
            ],
        ),
        (
            S::OrbitalEngineering,
            vec![(Science, 250000.0), (Blueprint, 250.0)],
            vec![
                s(S::Exogeology),
                s(S::Thorium),
                u(U::HubbleSpaceTelescope),
                u(U::AstroPhysicists),
                b(B::SpaceStation),
                b(B::SpaceElevator),
                u(U::SolarSatellites),
                u(U::Starlink),
            ],
        ),
        (S::Thorium, vec![(Science, 375000.0), (Blueprint, 375.0)], vec![]),
        (
            S::Exogeology,
            vec![(Science, 275000.0), (Blueprint, 250.0)],
            vec![
                s(S::AdvancedExogeology),
                u(U::UnobtainiumReflectors),
                u(U::UnobtainiumHuts),
                u(U::UnobtainiumDrill),
                u(U::HydroPlantTurbines),
                u(U::StorageBunkers),
            ],
        ),
        (
            S::AdvancedExogeology,
            vec![(Science, 325000.0), (Blueprint, 350.0)],
            vec![
                u(U::PlanetBuster),
                u(U::EludiumHuts),
                u(U::MicroWarpReactors),
                u(U::EludiumReflectors),
            ],
        ),
        (
            S::Nanotechnology,
            vec![(Science, 200000.0), (Blueprint, 150.0)],
            vec![
                s(S::Superconductors),
                u(U::PhotovoltaicCells),
                u(U::Nanosuits),
                u(U::Augmentations),
                u(U::FluidizedReactors),
                b(B::SpaceElevator),
            ],
        ),
        (
            S::Superconductors,
            vec![(Science, 225000.0), (Blueprint, 175.0)],
            vec![
                s(S::Antimatter),
                u(U::ColdFusion),
                u(U::SpaceManufacturing),
                u(U::Cryocomputing),
            ],
        ),
        (
            S::Antimatter,
            vec![(Science, 500000.0), (Relic, 1.0)],
            vec![
                s(S::Terraformation),
                u(U::AntimatterBases),
                u(U::AntimatterReactors),
                u(U::AntimatterFission),
                u(U::AntimatterDrive),
            ],
        ),
        (
            S::Terraformation,
            vec![(Science, 750000.0), (Relic, 5.0)],
            vec![s(S::HydroPonics), b(B::TerraformingStation)],
        ),
        (
            S::HydroPonics,
            vec![(Science, 1000000.0), (Relic, 25.0)],
            vec![s(S::Exophysics), b(B::Hydroponics)],
        ),
        (
            S::ParticlePhysics,
            vec![(Science, 185000.0), (Blueprint, 135.0)],
            vec![
                s(S::DimensionalPhysics),
                b(B::Accelerator),
                u(U::EnrichedUranium),
                u(U::Railgun),
            ],
        ),
        (
            S::DimensionalPhysics,
            vec![(Science, 235000.0)],
            vec![u(U::EnergyRifts), u(U::LHC)],
        ),
        (
            S::Chronophysics,
            vec![(Science, 250000.0), (Timecrystal, 5.0)],
            vec![
                s(S::TachyonTheory),
                u(U::StasisChambers),
                u(U::VoidEnergy),
                u(U::DarkEnergy),
            ],
        ),
        (
            S::TachyonTheory,
            vec![(Science, 750000.0), (Timecrystal, 25.0), (Relic, 1.0)],
            vec![s(S::VoidSpace), u(U::TachyonAccelerators)],
        ),
        (
            S::OrbitalLaunch,
            vec![
                (Starchart, 250.0),
                (Catpower, 5000.0),
                (Science, 100000.0),
                (Oil, 15000.0),
            ],
            vec![
                b(B::Satellite),
                b(B::SpaceElevator),
                s(S::MoonMission),
                b(B::SpaceStation),
            ],
        ),
        (
            S::MoonMission,
            vec![
                (Starchart, 500.0),
                (Titanium, 5000.0),
                (Science, 125000.0),
                (Oil, 45000.0),
            ],
            vec![
                b(B::LunarOutpost),
                b(B::MoonBase),
                s(S::DuneMission),
                s(S::PiscineMission),
            ],
        ),
        (
            S::DuneMission,
            vec![
                (Starchart, 1000.0),
                (Titanium, 7000.0),
                (Science, 175000.0),
                (Kerosene, 75.0),
            ],
            vec![
                s(S::HeliosMission),
                b(B::PlanetCracker),
                b(B::HydraulicFracturer),
                b(B::SpiceRefinery),
            ],
        ),
        (
            S::PiscineMission,
            vec![
                (Starchart, 1500.0),
                (Titanium, 9000.0),
                (Science, 200000.0),
                (Kerosene, 250.0),
            ],
            vec![s(S::TMinusMission), b(B::ResearchVessel), b(B::OrbitalArray)],
        ),
        (
            S::HeliosMission,
            vec![
                (Starchart, 3000.0),
                (Titanium, 15000.0),
                (Science, 250000.0),
                (Kerosene, 1250.0),
            ],
            vec![
                s(S::YarnMission),
                b(B::Sunlifter),
                b(B::ContainmentChamber),
                b(B::HeatSink),
                b(B::Sunforge),
            ],
        ),
        (
            S::TMinusMission,
            vec![
                (Starchart, 2500.0),
                (Titanium, 12000.0),
                (Science, 225000.0),
                (Kerosene, 750.0),
            ],
            vec![s(S::HeliosMission), s(S::KairoMission), b(B::Cryostation)],
        ),
        (
            S::KairoMission,
            vec![
                (Starchart, 5000.0),
                (Titanium, 20000.0),
                (Science, 300000.0),
                (Kerosene, 7500.0),
            ],
            vec![s(S::RorschachMission), b(B::SpaceBeacon)],
        ),
        (
            S::YarnMission,
            vec![
                (Starchart, 7500.0),
                (Titanium, 35000.0),
                (Science, 350000.0),
                (Kerosene, 12000.0),
            ],
            vec![
                s(S::UmbraMission),
                b(B::TerraformingStation),
                b(B::Hydroponics),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::conversion_list;
    use crate::pricing::compute_prices;

    fn index() -> ScienceIndex {
        let mut state = GameState::new();
        state.level.insert(Building::Hut, 4.0);
        let mut convs = conversion_list(&mut state);
        let prices = compute_prices(&mut state, &mut convs);
        ScienceIndex::build(&prices)
    }

    #[test]
    fn prerequisites_come_before_dependents() {
        let index = index();
        let state = GameState::new();
        let missing = index.missing_prerequisites(&state, Unlock::Building(Building::Smelter));
        let names: Vec<Science> = missing.iter().map(|&i| index.infos[i].name).collect();
        let pos = |s| names.iter().position(|&n| n == s).unwrap();
        assert!(pos(Science::Calendar) < pos(Science::Agriculture));
        assert!(pos(Science::Agriculture) < pos(Science::Mining));
        assert!(pos(Science::Mining) < pos(Science::MetalWorking));
    }

    #[test]
    fn diamond_prerequisites_appear_once() {
        let index = index();
        let state = GameState::new();
        // Helios is reachable through both Dune and TMinus; shared ancestors
        // must not repeat.
        let missing =
            index.missing_prerequisites(&state, Unlock::Building(Building::Sunlifter));
        let mut names: Vec<Science> = missing.iter().map(|&i| index.infos[i].name).collect();
        let len = names.len();
        names.sort_by_key(|n| format!("{n:?}"));
        names.dedup();
        assert_eq!(names.len(), len);
    }

    #[test]
    fn researched_gates_are_skipped() {
        let index = index();
        let mut state = GameState::new();
        for info in &index.infos {
            state.researched.insert(info.name, true);
        }
        assert!(index
            .missing_prerequisites(&state, Unlock::Building(Building::Smelter))
            .is_empty());
    }

    #[test]
    fn leaf_sciences_are_visible_from_the_start() {
        let index = index();
        let state = GameState::new();
        let calendar = index
            .infos
            .iter()
            .position(|i| i.name == Science::Calendar)
            .unwrap();
        assert!(index.visible(&state, calendar));
        let helios = index
            .infos
            .iter()
            .position(|i| i.name == Science::HeliosMission)
            .unwrap();
        assert!(!index.visible(&state, helios));
    }
}
