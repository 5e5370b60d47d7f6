/*!
# I/O Utilities for Saving MCMC Data to CSV

This module provides functions to save MCMC sample data to CSV files. Enable
via the `csv` feature.
*/

use ndarray::{Array3, Axis};
use std::fs::File;

use csv::Writer;

use crate::error::{Error, Result};

/**
Saves MCMC sample data as a CSV file.

The data is expected to be in a shape of **chain × iteration × parameter**,
with `names` labeling the parameters in order.

The resulting CSV file will have:
- A header row containing `"chain"`, `"iteration"`, and one column per
  parameter.
- Each subsequent row will correspond to a single iteration of a specific
  chain.

# Arguments

* `data` - An `Array3<T>` object containing the MCMC data.
* `names` - One column name per parameter.
* `filename` - The file path where the CSV data will be written.

# Returns

Returns `Ok(())` if successful, or an error if the names don't match the
data or any I/O or CSV formatting issue occurs.

# Examples

```rust
use mpg_mcmc::io::csv::save_csv;
use ndarray::arr3;

// One chain with 2 iterations over 3 parameters.
let data = arr3(&[[[20.1, -0.005, 4.2], [20.3, -0.006, 3.9]]]);
let names: Vec<String> = ["intercept", "weight", "sigma2"]
    .iter()
    .map(|s| s.to_string())
    .collect();

save_csv(&data, &names, "/tmp/samples.csv").expect("Expecting saving data to succeed");
```
*/
pub fn save_csv<T: std::fmt::Display>(
    data: &Array3<T>,
    names: &[String],
    filename: &str,
) -> Result<()> {
    let n_params = data.shape()[2];
    if names.len() != n_params {
        return Err(Error::Config(format!(
            "got {} parameter names for {n_params} sample columns",
            names.len()
        )));
    }

    let mut wtr = Writer::from_writer(File::create(filename)?);

    let mut header: Vec<String> = vec!["chain".to_string(), "iteration".to_string()];
    header.extend(names.iter().cloned());
    wtr.write_record(&header)?;

    // Flatten and write data
    for (chain_idx, chain) in data.axis_iter(Axis(0)).enumerate() {
        for (iter_idx, state) in chain.axis_iter(Axis(0)).enumerate() {
            let mut row = vec![chain_idx.to_string(), iter_idx.to_string()];
            row.extend(state.iter().map(|v| v.to_string()));
            wtr.write_record(&row)?;
        }
    }

    wtr.flush()?;
    Ok(())
}
