use crate::actions::{Action, ActionEffect, Evaluator};
use crate::production::science_limits;
use crate::types::{Building, Metaphysic, Res, Upgrade};

// ============================================================================
// Action Catalog - every purchasable thing, with costs and price ratios
// ============================================================================

/// Research infrastructure shows up both as ordinary purchases and as
/// storage candidates (more labs also mean a higher science cap).
pub fn science_building_actions(ev: &mut Evaluator) -> Vec<Action> {
    use Building::*;
    use Res::*;
    vec![
        ev.building(
            Accelerator,
            &[(Titanium, 7500.0), (Concrete, 125.0), (Uranium, 25.0)],
            1.15,
            Some(0.0),
        ),
        ev.building(Library, &[(Wood, 25.0)], 1.15, Some(0.0)),
        ev.building(DataCenter, &[(Concrete, 10.0), (Steel, 100.0)], 1.15, Some(0.0)),
        ev.building(
            Academy,
            &[(Wood, 50.0), (Minerals, 70.0), (Science, 100.0)],
            1.15,
            Some(0.0),
        ),
        ev.building(
            Observatory,
            &[(Scaffold, 50.0), (Slab, 35.0), (Iron, 750.0), (Science, 1000.0)],
            1.10,
            Some(0.0),
        ),
        ev.building(
            BioLab,
            &[(Slab, 100.0), (Alloy, 25.0), (Science, 1500.0)],
            1.10,
            Some(0.0),
        ),
        ev.space(
            ResearchVessel,
            &[(Starchart, 100.0), (Alloy, 2500.0), (Titanium, 12500.0), (Kerosene, 250.0)],
            1.15,
        ),
        ev.space(
            SpaceBeacon,
            &[(Starchart, 25000.0), (Antimatter, 50.0), (Alloy, 25000.0), (Kerosene, 7500.0)],
            1.15,
        ),
    ]
}

/// The main action list: every available purchase, assessed and sorted by
/// ROI ascending so the best marginal spend comes first.
pub fn main_actions(ev: &mut Evaluator) -> Vec<Action> {
    use Building::*;
    use Res::*;
    use Upgrade as U;

    let u = |ev: &Evaluator, up, v: f64| if ev.state.has(up) { v } else { 0.0 };
    let hut_reduction = u(ev, U::IronWoodHuts, 0.5)
        + u(ev, U::ConcreteHuts, 0.3)
        + u(ev, U::UnobtainiumHuts, 0.25)
        + u(ev, U::EludiumHuts, 0.1);

    let mut actions = vec![
        ev.building(CatnipField, &[(Catnip, 10.0)], 1.12, Some(0.0)),
        ev.building(Pasture, &[(Catnip, 100.0), (Wood, 10.0)], 1.15, Some(0.0)),
        ev.building(SolarFarm, &[(Titanium, 250.0)], 1.15, Some(0.0)),
        ev.building(Aqueduct, &[(Minerals, 75.0)], 1.12, Some(0.0)),
        ev.building(HydroPlant, &[(Concrete, 100.0), (Titanium, 2500.0)], 1.15, Some(0.0)),
        ev.building(Hut, &[(Wood, 5.0)], 2.5, Some(hut_reduction)),
        ev.building(LogHouse, &[(Wood, 200.0), (Minerals, 250.0)], 1.15, Some(0.0)),
        ev.building(
            Mansion,
            &[(Slab, 185.0), (Steel, 75.0), (Titanium, 25.0)],
            1.15,
            Some(0.0),
        ),
    ];
    actions.extend(science_building_actions(ev));
    actions.extend([
        ev.building(Mine, &[(Wood, 100.0)], 1.15, Some(0.0)),
        ev.building(
            Quarry,
            &[(Scaffold, 50.0), (Steel, 125.0), (Slab, 1000.0)],
            1.15,
            Some(0.0),
        ),
        ev.building(
            LumberMill,
            &[(Wood, 100.0), (Iron, 50.0), (Minerals, 250.0)],
            1.15,
            Some(0.0),
        ),
        ev.building(
            OilWell,
            &[(Steel, 50.0), (Gear, 25.0), (Scaffold, 25.0)],
            1.15,
            Some(0.0),
        ),
        ev.building(
            Steamworks,
            &[(Steel, 65.0), (Gear, 20.0), (Blueprint, 1.0)],
            1.25,
            Some(0.0),
        ),
        ev.building(
            Magneto,
            &[(Alloy, 10.0), (Gear, 5.0), (Blueprint, 1.0)],
            1.25,
            Some(0.0),
        ),
        ev.building(Smelter, &[(Minerals, 200.0)], 1.15, Some(0.0)),
        ev.building(
            Calciner,
            &[(Steel, 100.0), (Titanium, 15.0), (Blueprint, 1.0), (Oil, 500.0)],
            1.15,
            Some(0.0),
        ),
        ev.building(
            Factory,
            &[(Titanium, 2000.0), (Plate, 2500.0), (Concrete, 15.0)],
            1.15,
            Some(0.0),
        ),
        ev.building(
            Reactor,
            &[(Titanium, 3500.0), (Plate, 5000.0), (Concrete, 50.0), (Blueprint, 25.0)],
            1.15,
            Some(0.0),
        ),
        ev.building(
            Amphitheatre,
            &[(Wood, 200.0), (Minerals, 1200.0), (Parchment, 3.0)],
            1.15,
            Some(0.0),
        ),
        ev.building(BroadcastTower, &[(Iron, 1250.0), (Titanium, 75.0)], 1.18, Some(0.0)),
        ev.building(
            Chapel,
            &[(Minerals, 2000.0), (Culture, 250.0), (Parchment, 250.0)],
            1.15,
            Some(0.0),
        ),
        ev.building(
            Temple,
            &[(Slab, 25.0), (Plate, 15.0), (Manuscript, 10.0), (Gold, 50.0)],
            1.15,
            Some(0.0),
        ),
        ev.building(Workshop, &[(Wood, 100.0), (Minerals, 400.0)], 1.15, Some(0.0)),
        ev.building(
            TradePost,
            &[(Wood, 500.0), (Minerals, 200.0), (Gold, 10.0)],
            1.15,
            Some(0.0),
        ),
        ev.building(
            Mint,
            &[(Minerals, 5000.0), (Plate, 200.0), (Gold, 500.0)],
            1.15,
            Some(0.0),
        ),
        ev.building(UnicornPasture, &[(Unicorn, 2.0)], 1.75, Some(0.0)),
        ev.building(
            Ziggurat,
            &[(Megalith, 50.0), (Scaffold, 50.0), (Blueprint, 1.0)],
            1.25,
            Some(0.0),
        ),
        ev.space(
            SpaceElevator,
            &[(Titanium, 6000.0), (Science, 100000.0), (Unobtainium, 50.0)],
            1.15,
        ),
        ev.space(
            Satellite,
            &[(Starchart, 325.0), (Titanium, 2500.0), (Science, 100000.0), (Oil, 15000.0)],
            1.08,
        ),
        ev.space(
            SpaceStation,
            &[(Starchart, 425.0), (Alloy, 750.0), (Science, 150000.0), (Oil, 35000.0)],
            1.12,
        ),
        ev.space(
            LunarOutpost,
            &[
                (Starchart, 650.0),
                (Uranium, 500.0),
                (Alloy, 750.0),
                (Concrete, 150.0),
                (Science, 100000.0),
                (Oil, 55000.0),
            ],
            1.12,
        ),
        ev.space(
            PlanetCracker,
            &[(Starchart, 2500.0), (Alloy, 1750.0), (Science, 125000.0), (Kerosene, 50.0)],
            1.18,
        ),
        ev.space(
            HydraulicFracturer,
            &[(Starchart, 750.0), (Alloy, 1025.0), (Science, 150000.0), (Kerosene, 100.0)],
            1.18,
        ),
        ev.space(
            OrbitalArray,
            &[(Starchart, 2000.0), (Eludium, 100.0), (Science, 250000.0), (Kerosene, 500.0)],
            1.15,
        ),
        ev.space(
            Sunlifter,
            &[(Science, 500000.0), (Eludium, 225.0), (Kerosene, 2500.0)],
            1.15,
        ),
        ev.space(
            TerraformingStation,
            &[(Antimatter, 25.0), (Uranium, 5000.0), (Kerosene, 5000.0)],
            1.25,
        ),
        ev.space(Hydroponics, &[(Kerosene, 500.0)], 1.15),
        ev.upgrade(U::MineralHoes, &[(Science, 100.0), (Minerals, 275.0)]),
        ev.upgrade(U::IronHoes, &[(Science, 200.0), (Iron, 25.0)]),
        ev.upgrade(U::MineralAxe, &[(Science, 100.0), (Minerals, 500.0)]),
        ev.upgrade(U::IronAxe, &[(Science, 200.0), (Iron, 50.0)]),
        ev.upgrade(U::SteelAxe, &[(Science, 20000.0), (Steel, 75.0)]),
        ev.upgrade(U::ReinforcedSaw, &[(Science, 2500.0), (Iron, 1000.0)]),
        ev.upgrade(U::SteelSaw, &[(Science, 52000.0), (Steel, 750.0)]),
        ev.upgrade(U::AlloySaw, &[(Science, 85000.0), (Alloy, 75.0)]),
        ev.upgrade(U::TitaniumSaw, &[(Science, 75000.0), (Titanium, 500.0)]),
        ev.upgrade(U::TitaniumAxe, &[(Science, 38000.0), (Titanium, 10.0)]),
        ev.upgrade(U::AlloyAxe, &[(Science, 70000.0), (Alloy, 25.0)]),
        ev.upgrade(U::PhotovoltaicCells, &[(Titanium, 5000.0), (Science, 75000.0)]),
        ev.upgrade(
            U::ThinFilmCells,
            &[(Unobtainium, 200.0), (Uranium, 1000.0), (Science, 125000.0)],
        ),
        ev.upgrade(U::SolarSatellites, &[(Alloy, 750.0), (Science, 225000.0)]),
        ev.upgrade(
            U::IronWoodHuts,
            &[(Science, 30000.0), (Wood, 15000.0), (Iron, 3000.0)],
        ),
        ev.upgrade(
            U::ConcreteHuts,
            &[(Science, 125000.0), (Concrete, 45.0), (Titanium, 3000.0)],
        ),
        ev.upgrade(
            U::UnobtainiumHuts,
            &[(Science, 200000.0), (Unobtainium, 350.0), (Titanium, 15000.0)],
        ),
        ev.upgrade(U::EludiumHuts, &[(Eludium, 125.0), (Science, 275000.0)]),
        ev.upgrade(
            U::CompositeBow,
            &[(Science, 500.0), (Iron, 100.0), (Wood, 200.0)],
        ),
        ev.upgrade(U::Crossbow, &[(Science, 12000.0), (Iron, 1500.0)]),
        ev.upgrade(
            U::Railgun,
            &[(Science, 150000.0), (Titanium, 5000.0), (Blueprint, 25.0)],
        ),
        ev.upgrade(U::Bolas, &[(Science, 1000.0), (Minerals, 250.0), (Wood, 50.0)]),
        ev.upgrade(U::HuntingArmor, &[(Science, 2000.0), (Iron, 750.0)]),
        ev.upgrade(U::SteelArmor, &[(Science, 10000.0), (Steel, 50.0)]),
        ev.upgrade(U::AlloyArmor, &[(Science, 50000.0), (Alloy, 25.0)]),
        ev.upgrade(U::Nanosuits, &[(Science, 185000.0), (Alloy, 250.0)]),
        ev.upgrade(
            U::Geodesy,
            &[(Titanium, 250.0), (Starchart, 500.0), (Science, 90000.0)],
        ),
        ev.upgrade(
            U::MiningDrill,
            &[(Titanium, 1750.0), (Steel, 750.0), (Science, 100000.0)],
        ),
        ev.upgrade(
            U::UnobtainiumDrill,
            &[(Unobtainium, 250.0), (Alloy, 1250.0), (Science, 250000.0)],
        ),
        ev.upgrade(
            U::CoalFurnace,
            &[(Minerals, 5000.0), (Iron, 2000.0), (Beam, 35.0), (Science, 5000.0)],
        ),
        ev.upgrade(
            U::DeepMining,
            &[(Iron, 1200.0), (Beam, 50.0), (Science, 5000.0)],
        ),
        ev.upgrade(U::Pyrolysis, &[(Compendium, 5.0), (Science, 35000.0)]),
        ev.upgrade(
            U::ElectrolyticSmelting,
            &[(Titanium, 2000.0), (Science, 100000.0)],
        ),
        ev.upgrade(U::Oxidation, &[(Steel, 5000.0), (Science, 100000.0)]),
        ev.upgrade(
            U::RotaryKiln,
            &[(Titanium, 5000.0), (Gear, 500.0), (Science, 145000.0)],
        ),
        ev.upgrade(U::FluidizedReactors, &[(Alloy, 200.0), (Science, 175000.0)]),
        ev.upgrade(U::NuclearSmelters, &[(Uranium, 250.0), (Science, 165000.0)]),
        ev.upgrade(
            U::OrbitalGeodesy,
            &[(Alloy, 1000.0), (Oil, 35000.0), (Science, 150000.0)],
        ),
        ev.upgrade(U::PrintingPress, &[(Gear, 45.0), (Science, 7500.0)]),
        ev.upgrade(
            U::OffsetPress,
            &[(Gear, 250.0), (Oil, 15000.0), (Science, 100000.0)],
        ),
        ev.upgrade(
            U::Photolithography,
            &[(Alloy, 1250.0), (Oil, 50000.0), (Uranium, 250.0), (Science, 250000.0)],
        ),
        ev.upgrade(U::Cryocomputing, &[(Eludium, 15.0), (Science, 125000.0)]),
        ev.upgrade(
            U::HighPressureEngine,
            &[(Gear, 25.0), (Science, 20000.0), (Blueprint, 5.0)],
        ),
        ev.upgrade(
            U::FuelInjectors,
            &[(Gear, 250.0), (Oil, 20000.0), (Science, 100000.0)],
        ),
        ev.upgrade(
            U::FactoryLogistics,
            &[(Gear, 250.0), (Titanium, 2000.0), (Science, 100000.0)],
        ),
        ev.upgrade(
            U::SpaceManufacturing,
            &[(Titanium, 125000.0), (Science, 250000.0)],
        ),
        ev.upgrade(
            U::HydroPlantTurbines,
            &[(Unobtainium, 125.0), (Science, 250000.0)],
        ),
        ev.upgrade(U::AntimatterBases, &[(Eludium, 15.0), (Antimatter, 250.0)]),
        ev.upgrade(U::AntimatterDrive, &[(Antimatter, 125.0), (Science, 450000.0)]),
        ev.upgrade(
            U::Pumpjack,
            &[(Titanium, 250.0), (Gear, 125.0), (Science, 100000.0)],
        ),
        ev.upgrade(U::BiofuelProcessing, &[(Titanium, 1250.0), (Science, 150000.0)]),
        ev.upgrade(U::UnicornSelection, &[(Titanium, 1500.0), (Science, 175000.0)]),
        ev.upgrade(
            U::GMCatnip,
            &[(Titanium, 1500.0), (Catnip, 1000000.0), (Science, 175000.0)],
        ),
        ev.upgrade(U::CADsystem, &[(Titanium, 750.0), (Science, 125000.0)]),
        ev.upgrade(U::SETI, &[(Titanium, 250.0), (Science, 125000.0)]),
        ev.upgrade(
            U::Logistics,
            &[(Gear, 100.0), (Scaffold, 1000.0), (Science, 100000.0)],
        ),
        ev.upgrade(
            U::Augmentations,
            &[(Titanium, 5000.0), (Uranium, 50.0), (Science, 150000.0)],
        ),
        ev.upgrade(
            U::EnrichedUranium,
            &[(Titanium, 7500.0), (Uranium, 150.0), (Science, 175000.0)],
        ),
        ev.upgrade(U::ColdFusion, &[(Eludium, 25.0), (Science, 200000.0)]),
        ev.upgrade(
            U::OilRefinery,
            &[(Titanium, 1250.0), (Gear, 500.0), (Science, 125000.0)],
        ),
        ev.upgrade(
            U::HubbleSpaceTelescope,
            &[(Alloy, 1250.0), (Oil, 50000.0), (Science, 250000.0)],
        ),
        ev.upgrade(
            U::AstroPhysicists,
            &[(Unobtainium, 350.0), (Science, 250000.0)],
        ),
        ev.upgrade(U::MicroWarpReactors, &[(Eludium, 50.0), (Science, 150000.0)]),
        ev.upgrade(U::PlanetBuster, &[(Eludium, 250.0), (Science, 275000.0)]),
        ev.upgrade(U::OilDistillation, &[(Titanium, 5000.0), (Science, 175000.0)]),
        ev.upgrade(
            U::FactoryProcessing,
            &[(Titanium, 7500.0), (Concrete, 125.0), (Science, 195000.0)],
        ),
        ev.upgrade(
            U::RoboticAssistance,
            &[(Steel, 10000.0), (Gear, 250.0), (Science, 100000.0)],
        ),
        ev.religious(SolarChant, &[(Faith, 100.0)]),
        ev.religious(SunAltar, &[(Faith, 500.0), (Gold, 250.0)]),
        ev.religious(StainedGlass, &[(Faith, 500.0), (Gold, 250.0)]),
        ev.religious(Basilica, &[(Faith, 1250.0), (Gold, 750.0)]),
        ev.religious(Templars, &[(Faith, 3500.0), (Gold, 3000.0)]),
        ev.upgrade(U::SolarRevolution, &[(Faith, 750.0), (Gold, 500.0)]),
        ev.upgrade(U::Transcendence, &[(Faith, 7500.0), (Gold, 7500.0)]),
        ev.ziggurat(UnicornTomb, &[(Ivory, 500.0), (Tear, 5.0)], 1.15),
        ev.ziggurat(IvoryTower, &[(Ivory, 25000.0), (Tear, 25.0)], 1.15),
        ev.ziggurat(IvoryCitadel, &[(Ivory, 50000.0), (Tear, 50.0)], 1.15),
        ev.ziggurat(
            SkyPalace,
            &[(Ivory, 125000.0), (Megalith, 5.0), (Tear, 500.0)],
            1.15,
        ),
        ev.ziggurat(
            UnicornUtopia,
            &[(Ivory, 1000000.0), (Gold, 500.0), (Tear, 5000.0)],
            1.15,
        ),
        ev.ziggurat(
            SunSpire,
            &[(Ivory, 750000.0), (Gold, 1250.0), (Tear, 25000.0)],
            1.15,
        ),
        ev.ziggurat(
            Marker,
            &[(Tear, 5000.0), (Unobtainium, 2500.0), (Megalith, 750.0)],
            1.15,
        ),
        ev.ziggurat(
            BlackPyramid,
            &[(Sorrow, 5.0), (Unobtainium, 5000.0), (Megalith, 2500.0)],
            1.15,
        ),
    ]);
    actions.extend(Building::activatable().map(|b| ev.activation(b)));
    actions.push(ev.tradeship());
    actions.push(ev.praise());
    actions.push(ev.feed_elders());

    let mut assessed: Vec<Action> = actions
        .into_iter()
        .filter(|a| a.available)
        .map(|a| ev.assess(a))
        .collect();
    assessed.sort_by(|a, b| a.roi.total_cmp(&b.roi));
    assessed
}

/// Candidates considered when an action needs more room. Not assessed here;
/// the optimizer judges them by capacity gained per unit cost instead, and
/// the report assesses its own copy. With a desired science limit, a
/// compendia purchase sized exactly for that limit joins the list.
pub fn storage_actions(ev: &mut Evaluator, desired_science_limit: Option<f64>) -> Vec<Action> {
    use Building::*;
    use Res::*;
    use Upgrade as U;

    let mut actions = vec![
        ev.building(Barn, &[(Wood, 50.0)], 1.75, Some(0.0)),
        ev.building(Warehouse, &[(Beam, 1.5), (Slab, 2.0)], 1.15, Some(0.0)),
        ev.building(
            Harbor,
            &[(Scaffold, 5.0), (Slab, 50.0), (Plate, 75.0)],
            1.15,
            Some(0.0),
        ),
        ev.building(
            OilWell,
            &[(Steel, 50.0), (Gear, 25.0), (Scaffold, 25.0)],
            1.15,
            Some(0.0),
        ),
    ];
    actions.extend(science_building_actions(ev));
    if let Some(limit) = desired_science_limit {
        actions.push(compendia_action(ev, limit));
    }
    actions.extend([
        ev.space(
            MoonBase,
            &[
                (Starchart, 700.0),
                (Titanium, 9500.0),
                (Concrete, 250.0),
                (Science, 100000.0),
                (Unobtainium, 50.0),
                (Oil, 70000.0),
            ],
            1.12,
        ),
        ev.space(
            Cryostation,
            &[(Eludium, 25.0), (Concrete, 1500.0), (Science, 200000.0), (Kerosene, 500.0)],
            1.12,
        ),
        ev.space(
            ContainmentChamber,
            &[(Science, 500000.0), (Kerosene, 2500.0)],
            1.125,
        ),
        ev.space(
            Sunforge,
            &[(Science, 100000.0), (Relic, 1.0), (Kerosene, 1250.0), (Antimatter, 250.0)],
            1.12,
        ),
        ev.upgrade(
            U::ExpandedBarns,
            &[(Science, 500.0), (Wood, 1000.0), (Minerals, 750.0), (Iron, 50.0)],
        ),
        ev.upgrade(
            U::ReinforcedBarns,
            &[(Science, 800.0), (Beam, 25.0), (Slab, 10.0), (Iron, 100.0)],
        ),
        ev.upgrade(
            U::ReinforcedWarehouses,
            &[(Science, 15000.0), (Plate, 50.0), (Steel, 50.0), (Scaffold, 25.0)],
        ),
        ev.upgrade(
            U::Silos,
            &[(Science, 50000.0), (Steel, 125.0), (Blueprint, 5.0)],
        ),
        ev.upgrade(U::ExpandedCargo, &[(Science, 55000.0), (Blueprint, 15.0)]),
        ev.upgrade(
            U::ReactorVessel,
            &[(Science, 135000.0), (Titanium, 5000.0), (Uranium, 125.0)],
        ),
        ev.upgrade(
            U::TitaniumBarns,
            &[(Science, 60000.0), (Titanium, 25.0), (Steel, 200.0), (Scaffold, 250.0)],
        ),
        ev.upgrade(
            U::AlloyBarns,
            &[(Science, 75000.0), (Alloy, 20.0), (Plate, 750.0)],
        ),
        ev.upgrade(
            U::ConcreteBarns,
            &[(Science, 100000.0), (Concrete, 45.0), (Titanium, 2000.0)],
        ),
        ev.upgrade(
            U::TitaniumWarehouses,
            &[(Science, 70000.0), (Titanium, 50.0), (Steel, 500.0), (Scaffold, 500.0)],
        ),
        ev.upgrade(
            U::AlloyWarehouses,
            &[(Science, 90000.0), (Titanium, 750.0), (Alloy, 50.0)],
        ),
        ev.upgrade(
            U::ConcreteWarehouses,
            &[(Science, 100000.0), (Titanium, 1250.0), (Concrete, 35.0)],
        ),
        ev.upgrade(
            U::StorageBunkers,
            &[(Science, 25000.0), (Unobtainium, 500.0), (Concrete, 1250.0)],
        ),
        ev.upgrade(
            U::EnergyRifts,
            &[(Science, 200000.0), (Titanium, 7500.0), (Uranium, 250.0)],
        ),
        ev.upgrade(
            U::StasisChambers,
            &[(Alloy, 200.0), (Uranium, 2000.0), (Timecrystal, 1.0), (Science, 235000.0)],
        ),
        ev.upgrade(
            U::VoidEnergy,
            &[(Alloy, 250.0), (Uranium, 2500.0), (Timecrystal, 2.0), (Science, 275000.0)],
        ),
        ev.upgrade(
            U::DarkEnergy,
            &[(Eludium, 75.0), (Timecrystal, 3.0), (Science, 350000.0)],
        ),
        ev.upgrade(
            U::TachyonAccelerators,
            &[(Eludium, 125.0), (Timecrystal, 10.0), (Science, 500000.0)],
        ),
        ev.upgrade(
            U::LHC,
            &[(Science, 250000.0), (Unobtainium, 100.0), (Alloy, 150.0)],
        ),
        ev.upgrade(
            U::Refrigeration,
            &[(Science, 125000.0), (Titanium, 2500.0), (Blueprint, 15.0)],
        ),
        ev.upgrade(U::ConcretePillars, &[(Science, 100000.0), (Concrete, 50.0)]),
        ev.upgrade(U::Uplink, &[(Alloy, 1750.0), (Science, 75000.0)]),
        ev.upgrade(
            U::Starlink,
            &[(Alloy, 5000.0), (Oil, 25000.0), (Science, 175000.0)],
        ),
        ev.upgrade(
            U::Astrolabe,
            &[(Titanium, 5.0), (Starchart, 75.0), (Science, 25000.0)],
        ),
        ev.upgrade(
            U::TitaniumReflectors,
            &[(Titanium, 15.0), (Starchart, 20.0), (Science, 20000.0)],
        ),
        ev.upgrade(
            U::UnobtainiumReflectors,
            &[(Unobtainium, 75.0), (Starchart, 750.0), (Science, 250000.0)],
        ),
        ev.upgrade(U::EludiumReflectors, &[(Eludium, 15.0), (Science, 250000.0)]),
        ev.upgrade(U::AntimatterReactors, &[(Eludium, 35.0), (Antimatter, 750.0)]),
        ev.religious(Scholasticism, &[(Faith, 250.0)]),
        ev.religious(GoldenSpire, &[(Faith, 350.0), (Gold, 150.0)]),
    ]);

    actions.into_iter().filter(|a| a.available).collect()
}

/// A compendia purchase sized to raise the science cap to exactly
/// `desired_limit`. Only offered while compendia can actually bridge the
/// gap between the building cap and the target.
fn compendia_action(ev: &mut Evaluator, desired_limit: f64) -> Action {
    let limits = science_limits(ev.state);
    let desired_by_compendia = desired_limit - limits.by_buildings;
    let available = 0.0 < desired_by_compendia && desired_by_compendia < limits.by_compendia;
    // Nudge past the cap so rounding cannot leave the purchase short.
    let desired = desired_by_compendia / limits.per_compendium + 1e-6;
    let needed = desired - ev.state.compendia;

    ev.custom(
        format!("{} compendia", needed.round()),
        ActionEffect::Compendia { desired },
        &[(Res::Compendium, needed)],
        false,
        available,
    )
}

/// Paragon perks: priced in paragon rather than resources, assessed like
/// everything else and sorted by ROI.
pub fn metaphysic_actions(ev: &mut Evaluator) -> Vec<Action> {
    use Metaphysic::*;
    let mut actions: Vec<Action> = [
        (Engineering, 5.0),
        (Diplomacy, 5.0),
        (GoldenRatio, 50.0),
        (DivineProportion, 100.0),
        (VitruvianFeline, 250.0),
        (Renaissance, 750.0),
        (CodexVox, 25.0),
        (Chronomancy, 25.0),
        (Astromancy, 50.0),
    ]
    .into_iter()
    .map(|(m, cost)| {
        let action = ev.metaphysic(m, cost);
        ev.assess(action)
    })
    .collect();
    actions.sort_by(|a, b| a.roi.total_cmp(&b.roi));
    actions
}
