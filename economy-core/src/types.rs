use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

// ============================================================================
// Resources - everything that can be produced, consumed, priced or stored
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub enum Res {
    // Basic: produced by buildings and workers
    Catnip,
    Wood,
    Minerals,
    Iron,
    Coal,
    Gold,
    Oil,
    Titanium,
    Uranium,
    Unobtainium,
    Catpower,
    Science,
    Culture,
    Faith,
    Unicorn,
    Alicorn,
    Necrocorn,
    Antimatter,
    Starchart,
    Fur,
    Ivory,
    // Converted: only exist via the conversion network
    Slab,
    Beam,
    Plate,
    Steel,
    Concrete,
    Gear,
    Alloy,
    Scaffold,
    Megalith,
    Eludium,
    Kerosene,
    Parchment,
    Manuscript,
    Compendium,
    Blueprint,
    Tear,
    Sorrow,
    Timecrystal,
    Relic,
}

impl Res {
    /// All resources, in canonical report order.
    pub fn all() -> impl Iterator<Item = Res> {
        use Res::*;
        [
            Catnip, Wood, Minerals, Iron, Coal, Gold, Oil, Titanium, Uranium, Unobtainium,
            Catpower, Science, Culture, Faith, Unicorn, Alicorn, Necrocorn, Antimatter, Starchart,
            Fur, Ivory, Slab, Beam, Plate, Steel, Concrete, Gear, Alloy, Scaffold, Megalith,
            Eludium, Kerosene, Parchment, Manuscript, Compendium, Blueprint, Tear, Sorrow,
            Timecrystal, Relic,
        ]
        .into_iter()
    }

    pub fn name(&self) -> String {
        format!("{self:?}")
    }
}

// ============================================================================
// Jobs - worker assignments
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub enum Job {
    Farmer,
    Woodcutter,
    Miner,
    Hunter,
    Geologist,
    Scholar,
    Priest,
}

impl Job {
    pub fn all() -> impl Iterator<Item = Job> {
        use Job::*;
        [Farmer, Woodcutter, Miner, Hunter, Geologist, Scholar, Priest].into_iter()
    }
}

// ============================================================================
// Buildings
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub enum Building {
    // Food & housing
    CatnipField,
    Pasture,
    SolarFarm,
    Aqueduct,
    HydroPlant,
    Hut,
    LogHouse,
    Mansion,
    // Science
    Library,
    DataCenter,
    Academy,
    Observatory,
    BioLab,
    Accelerator,
    // Industry
    Mine,
    Quarry,
    LumberMill,
    OilWell,
    Steamworks,
    Magneto,
    Smelter,
    Calciner,
    Factory,
    Reactor,
    // Culture & trade
    Amphitheatre,
    BroadcastTower,
    Chapel,
    Temple,
    Workshop,
    TradePost,
    Mint,
    UnicornPasture,
    Ziggurat,
    // Storage
    Barn,
    Warehouse,
    Harbor,
    // Religion (temple extensions)
    SolarChant,
    SunAltar,
    StainedGlass,
    Basilica,
    Templars,
    Scholasticism,
    GoldenSpire,
    // Ziggurat line
    UnicornTomb,
    IvoryTower,
    IvoryCitadel,
    SkyPalace,
    UnicornUtopia,
    SunSpire,
    Marker,
    BlackPyramid,
    // Space
    SpaceElevator,
    Satellite,
    SpaceStation,
    LunarOutpost,
    MoonBase,
    PlanetCracker,
    HydraulicFracturer,
    SpiceRefinery,
    ResearchVessel,
    OrbitalArray,
    Sunlifter,
    ContainmentChamber,
    HeatSink,
    Sunforge,
    Cryostation,
    SpaceBeacon,
    TerraformingStation,
    Hydroponics,
}

impl Building {
    pub fn name(&self) -> String {
        format!("{self:?}")
    }

    /// Buildings the player can switch off (energy or upkeep reasons).
    pub fn activatable() -> impl Iterator<Item = Building> {
        use Building::*;
        [
            Smelter, Calciner, Steamworks, Magneto, Factory, Reactor, Accelerator, BioLab,
            DataCenter, Mint, OilWell, SpaceStation, LunarOutpost, MoonBase, OrbitalArray,
            ContainmentChamber,
        ]
        .into_iter()
    }

    /// The newer building that supersedes this one, if any.
    pub fn obsoleted_by(&self) -> Option<Building> {
        match self {
            Building::Amphitheatre => Some(Building::BroadcastTower),
            Building::Aqueduct => Some(Building::HydroPlant),
            Building::Library => Some(Building::DataCenter),
            Building::Pasture => Some(Building::SolarFarm),
            _ => None,
        }
    }

    /// The older building this one replaces when first built, if any.
    pub fn obsoletes(&self) -> Option<Building> {
        match self {
            Building::BroadcastTower => Some(Building::Amphitheatre),
            Building::DataCenter => Some(Building::Library),
            Building::HydroPlant => Some(Building::Aqueduct),
            Building::SolarFarm => Some(Building::Pasture),
            _ => None,
        }
    }
}

// ============================================================================
// Workshop upgrades
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub enum Upgrade {
    // Tools & weapons
    MineralHoes,
    IronHoes,
    MineralAxe,
    IronAxe,
    SteelAxe,
    TitaniumAxe,
    AlloyAxe,
    ReinforcedSaw,
    SteelSaw,
    TitaniumSaw,
    AlloySaw,
    CompositeBow,
    Crossbow,
    Railgun,
    Bolas,
    HuntingArmor,
    SteelArmor,
    AlloyArmor,
    Nanosuits,
    Logistics,
    Augmentations,
    // Mining & smelting
    Geodesy,
    MiningDrill,
    UnobtainiumDrill,
    CoalFurnace,
    DeepMining,
    Pyrolysis,
    ElectrolyticSmelting,
    Oxidation,
    RotaryKiln,
    FluidizedReactors,
    NuclearSmelters,
    OrbitalGeodesy,
    // Printing
    PrintingPress,
    OffsetPress,
    Photolithography,
    // Energy
    PhotovoltaicCells,
    ThinFilmCells,
    SolarSatellites,
    HydroPlantTurbines,
    ColdFusion,
    EnrichedUranium,
    AntimatterBases,
    AntimatterReactors,
    AntimatterFission,
    AntimatterDrive,
    // Housing
    IronWoodHuts,
    ConcreteHuts,
    UnobtainiumHuts,
    EludiumHuts,
    // Oil & biotech
    Pumpjack,
    BiofuelProcessing,
    OilRefinery,
    OilDistillation,
    GMCatnip,
    UnicornSelection,
    // Engines & factories
    HighPressureEngine,
    FuelInjectors,
    FactoryLogistics,
    SpaceManufacturing,
    FactoryProcessing,
    RoboticAssistance,
    // Science & space
    CADsystem,
    SETI,
    Cryocomputing,
    HubbleSpaceTelescope,
    AstroPhysicists,
    MicroWarpReactors,
    PlanetBuster,
    Telecommunication,
    Uplink,
    Starlink,
    Astrolabe,
    TitaniumReflectors,
    UnobtainiumReflectors,
    EludiumReflectors,
    LHC,
    Refrigeration,
    // Storage
    ExpandedBarns,
    ReinforcedBarns,
    ReinforcedWarehouses,
    Silos,
    ExpandedCargo,
    ReactorVessel,
    TitaniumBarns,
    AlloyBarns,
    ConcreteBarns,
    TitaniumWarehouses,
    AlloyWarehouses,
    ConcreteWarehouses,
    StorageBunkers,
    EnergyRifts,
    StasisChambers,
    VoidEnergy,
    DarkEnergy,
    TachyonAccelerators,
    ConcretePillars,
    // Religion
    SolarRevolution,
    Transcendence,
}

impl Upgrade {
    pub fn name(&self) -> String {
        format!("{self:?}")
    }
}

// ============================================================================
// Metaphysics - paragon-bought permanent perks
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub enum Metaphysic {
    Engineering,
    Diplomacy,
    GoldenRatio,
    DivineProportion,
    VitruvianFeline,
    Renaissance,
    CodexVox,
    Chronomancy,
    Astromancy,
}

impl Metaphysic {
    pub fn name(&self) -> String {
        format!("{self:?}")
    }
}

// ============================================================================
// Sciences - the research tree
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub enum Science {
    Calendar,
    Agriculture,
    Archery,
    AnimalHusbandry,
    Mining,
    MetalWorking,
    Mathematics,
    Construction,
    CivilService,
    Engineering,
    Currency,
    Writing,
    Philosophy,
    Steel,
    Machinery,
    Theology,
    Cryptotheology,
    Astronomy,
    Navigation,
    Architecture,
    Physics,
    Metaphysics,
    Chemistry,
    Acoustics,
    Geology,
    DramaAndPoetry,
    Electricity,
    Biology,
    Biochemistry,
    Genetics,
    Industrialization,
    Mechanization,
    Combustion,
    Metallurgy,
    Ecology,
    Electronics,
    Robotics,
    ArtificialIntelligence,
    QuantumCryptography,
    NuclearFission,
    Rocketry,
    OilProcessing,
    Satellites,
    OrbitalEngineering,
    Thorium,
    Exogeology,
    AdvancedExogeology,
    Nanotechnology,
    Superconductors,
    Antimatter,
    Terraformation,
    HydroPonics,
    Exophysics,
    ParticlePhysics,
    DimensionalPhysics,
    Chronophysics,
    TachyonTheory,
    VoidSpace,
    // Space missions
    OrbitalLaunch,
    MoonMission,
    DuneMission,
    PiscineMission,
    HeliosMission,
    TMinusMission,
    KairoMission,
    YarnMission,
    RorschachMission,
    UmbraMission,
}

impl Science {
    pub fn name(&self) -> String {
        format!("{self:?}")
    }
}

/// Anything a science can unlock; the prerequisite index is keyed by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unlock {
    Science(Science),
    Upgrade(Upgrade),
    Building(Building),
    Job(Job),
}

// ============================================================================
// Cart - sparse signed quantities per resource
// ============================================================================

/// Quantities below this are treated as zero throughout the engine.
pub const EPS: f64 = 1e-6;

/// Sparse map from resource to signed quantity. Absent key means zero;
/// positive means produced, negative means consumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct Cart(pub HashMap<Res, f64>);

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, res: Res) -> f64 {
        self.0.get(&res).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, res: Res) -> bool {
        self.0.contains_key(&res)
    }

    pub fn insert(&mut self, res: Res, amount: f64) {
        self.0.insert(res, amount);
    }

    pub fn add(&mut self, res: Res, amount: f64) {
        *self.0.entry(res).or_insert(0.0) += amount;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Res, f64)> + '_ {
        self.0.iter().map(|(r, q)| (*r, *q))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Res, f64)> for Cart {
    fn from_iter<T: IntoIterator<Item = (Res, f64)>>(iter: T) -> Self {
        Cart(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_absent_key_reads_zero() {
        let mut cart = Cart::new();
        assert_eq!(cart.get(Res::Catnip), 0.0);
        cart.add(Res::Catnip, 2.5);
        cart.add(Res::Catnip, -1.0);
        assert_eq!(cart.get(Res::Catnip), 1.5);
    }

    #[test]
    fn obsolescence_pairs_are_symmetric() {
        for b in [
            Building::BroadcastTower,
            Building::DataCenter,
            Building::HydroPlant,
            Building::SolarFarm,
        ] {
            let old = b.obsoletes().unwrap();
            assert_eq!(old.obsoleted_by(), Some(b));
        }
    }
}
