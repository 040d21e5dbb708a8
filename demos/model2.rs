//! Linear chain `S0 -> S1 -> ... -> S10` with Michaelis-Menten rate laws.
//!
//! Run with `cargo run --example model2`. The model is written to
//! `results/model2.json` and packed together with its manifest into
//! `results/model2_archive`.

use std::error::Error;

use pathwayml::prelude::*;
use pathwayml::sbo;

const N_CHAIN: usize = 10;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut model = ModelBuilder::default()
        .id("model2")
        .name("Example model from COMBINE2021 linear chain")
        .notes(
            "# COMBINE2021 model\n\
             This model was built within the **tutorial session**.",
        )
        .to_units(UnitDefinition::new("min"))
        .to_units(UnitDefinition::new("mmole"))
        .to_units(UnitDefinition::composite("mmole_per_min", "mmole/min"))
        .to_units(UnitDefinition::composite("mM", "mmole/liter"))
        .model_units(
            ModelUnitsBuilder::default()
                .time("min")
                .substance("mmole")
                .extent("mmole")
                .length("meter")
                .volume("liter")
                .build()?,
        )
        .to_compartments(
            CompartmentBuilder::default()
                .id("c")
                .name("cytosol")
                .value(1.0)
                .unit("liter")
                .sbo_term(sbo::PHYSICAL_COMPARTMENT)
                .to_annotations((Qualifier::BqbIs, "ncit/C61554"))
                .to_annotations((Qualifier::BqbIs, "GO:0005829"))
                .to_annotations((Qualifier::BqbIs, "FMA:66836"))
                .build()?,
        )
        .to_parameters(
            ParameterBuilder::default()
                .id("R_Vmax")
                .value(10.0)
                .unit("mmole_per_min")
                .sbo_term(sbo::MAXIMAL_VELOCITY)
                .build()?,
        )
        .to_parameters(
            ParameterBuilder::default()
                .id("R_Km")
                .value(0.1)
                .unit("mM")
                .sbo_term(sbo::MICHAELIS_CONSTANT)
                .build()?,
        )
        .to_species(chain_species(0, 10.0)?)
        .build()?;

    for k in 0..N_CHAIN {
        model.add_species(chain_species(k + 1, 0.0)?)?;
        model.add_reaction(
            ReactionBuilder::default()
                .id(format!("R{k}"))
                .name(format!("R{k}"))
                .sbo_term(sbo::BIOCHEMICAL_REACTION)
                .try_equation(format!("S{k} -> S{}", k + 1))?
                .kinetic_law((format!("R_Vmax * S{k}/(S{k} + R_Km)"), "mmole_per_min"))
                .build()?,
        )?;
    }

    let options = FactoryOptionsBuilder::default()
        .output_dir("results")
        .units_consistency(true)
        .build()?;

    let result = create_model(&mut model, &options, &JsonSerializer)?;
    println!("{model}");

    let archive_path = archive(
        &result,
        &DirectoryArchiver,
        &[],
        options.output_dir.join("model2_archive"),
    )?;
    println!("Archive written to {}", archive_path.display());

    Ok(())
}

fn chain_species(index: usize, initial: f64) -> Result<Species, SpeciesBuilderError> {
    SpeciesBuilder::default()
        .id(format!("S{index}"))
        .name(format!("S{index}"))
        .compartment("c")
        .initial_concentration(initial)
        .has_only_substance_units(false)
        .substance_unit("mmole")
        .sbo_term(sbo::SIMPLE_CHEMICAL)
        .build()
}
