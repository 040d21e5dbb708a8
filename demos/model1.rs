//! Single-compartment model with one annotated species.
//!
//! Run with `cargo run --example model1`. The model is written to
//! `results/model1.json`.

use std::error::Error;

use pathwayml::prelude::*;
use pathwayml::sbo;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut model = ModelBuilder::default()
        .id("model1")
        .name("Example model from COMBINE2021")
        .notes(
            "# COMBINE2021 model\n\
             This model was built within the **tutorial session**.",
        )
        .to_compartments(
            CompartmentBuilder::default()
                .id("c")
                .name("cytosol")
                .value(1.0)
                .sbo_term(sbo::PHYSICAL_COMPARTMENT)
                .to_annotations((Qualifier::BqbIs, "ncit/C61554"))
                .to_annotations((Qualifier::BqbIs, "GO:0005829"))
                .to_annotations((Qualifier::BqbIs, "FMA:66836"))
                .build()?,
        )
        .to_species(
            SpeciesBuilder::default()
                .id("glc")
                .name("glucose")
                .compartment("c")
                .initial_concentration(10.0)
                .has_only_substance_units(false)
                .sbo_term(sbo::SIMPLE_CHEMICAL)
                .to_annotations((Qualifier::BqbIs, "ncit/C2831"))
                .to_annotations((Qualifier::BqbIs, "CHEBI:17234"))
                .build()?,
        )
        .build()?;

    let options = FactoryOptionsBuilder::default()
        .output_dir("results")
        .units_consistency(false)
        .build()?;

    let result = create_model(&mut model, &options, &JsonSerializer)?;
    println!("{model}");
    println!("Model written to {}", result.model_path.display());

    Ok(())
}
