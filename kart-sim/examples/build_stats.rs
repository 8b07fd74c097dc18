// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Build statistics for the bundled presets
//!
//! Prints the catalog by category, then the derived stats of every preset.

use kart_sim::assembly::{BuildStats, VehicleAssembly};
use kart_sim::blueprint::presets;
use kart_sim::catalog::PartCategory;
use kart_sim::{PartCatalog, RaceError};

fn main() -> Result<(), RaceError> {
    env_logger::init();

    println!("Kart Sim - Build Stats");
    println!("======================\n");

    let catalog = PartCatalog::bundled()?;
    println!("Catalog: {} parts", catalog.len());
    for category in PartCategory::ALL {
        let names: Vec<&str> = catalog
            .by_category(category)
            .iter()
            .map(|part| part.name.as_str())
            .collect();
        println!("  {:<10} {}", category, names.join(", "));
    }

    for (name, blueprint) in presets::all()? {
        let assembly = VehicleAssembly::from_blueprint(&blueprint, &catalog);
        let stats = BuildStats::compute(&blueprint, &catalog);

        println!("\n{name}");
        println!("  parts:       {} ({} skipped)", assembly.resolved_parts, assembly.skipped_parts);
        println!("  mass:        {:.1}", stats.mass);
        println!("  drag:        {:.3}", stats.drag);
        println!("  cg height:   {:.2}", stats.cg_height);
        println!("  track:       {:.1}", stats.track);
        println!("  wheelbase:   {:.1}", stats.wheelbase);
        println!("  wheels:      {}", stats.wheel_count);
        println!("  top speed:   {:.1}", stats.estimated_top_speed);
        println!("  stability:   {}", stats.stability.message());
        println!("  ballast:     {:.1} at {}", assembly.ballast.mass, assembly.ballast.position);
    }

    Ok(())
}
