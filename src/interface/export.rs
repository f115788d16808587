use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::IngredientMap;
use crate::planner::Demand;

/// Write an ingredient map as `name,amount,unit` rows.
pub fn write_csv<W: Write>(items: &IngredientMap, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["name", "amount", "unit"])?;
    for (name, total) in items {
        let amount = format!("{:.1}", total.amount);
        wtr.write_record([name.as_str(), amount.as_str(), total.unit.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn export_csv(items: &IngredientMap, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(items, file)
}

/// Write a demand as JSON: the ingredient map plus the unresolved dish ids.
pub fn export_demand_json(demand: &Demand, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(demand)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn export_json(items: &IngredientMap, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(items)?;
    std::fs::write(path, json)?;
    Ok(())
}
