use indicatif::ProgressBar;
use indicatif::{MultiProgress, ProgressStyle};
use ndarray::{aview1, Array2, Array3, Axis};
use num_traits::Zero;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

pub trait MarkovChain<S> {
    /// Does one iteration of the chain, returning the new current state.
    fn step(&mut self) -> &Vec<S>;

    /// Gets the current state without stepping.
    fn current_state(&self) -> &Vec<S>;
}

pub fn run_chain<S, M>(chain: &mut M, n_steps: usize) -> Array2<S>
where
    M: MarkovChain<S>,
    S: Clone + Zero,
{
    let dim = chain.current_state().len();
    let mut out = Array2::<S>::zeros((n_steps, dim));

    for i in 0..n_steps {
        let state = chain.step();
        out.row_mut(i).assign(&aview1(state));
    }

    out
}

pub fn run_chain_with_progress<S, M>(chain: &mut M, n_steps: usize, pb: &ProgressBar) -> Array2<S>
where
    M: MarkovChain<S>,
    S: Clone + Zero,
{
    let dim = chain.current_state().len();
    let mut out = Array2::<S>::zeros((n_steps, dim));

    pb.set_length(n_steps as u64);

    for i in 0..n_steps {
        let state = chain.step();
        out.row_mut(i).assign(&aview1(state));

        // Update progress bar
        pb.inc(1);
    }

    out
}

/// Runs a chain until `n_steps` iterations have completed or `stop` is set,
/// whichever comes first. The flag is checked once per iteration, so the rows
/// produced so far are always complete states.
pub fn run_chain_until<S, M>(chain: &mut M, n_steps: usize, stop: &AtomicBool) -> Array2<S>
where
    M: MarkovChain<S>,
    S: Clone + Zero,
{
    let dim = chain.current_state().len();
    let mut flat: Vec<S> = Vec::with_capacity(n_steps * dim);

    for _ in 0..n_steps {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        flat.extend_from_slice(chain.step());
    }

    let rows = flat.len() / dim;
    Array2::from_shape_vec((rows, dim), flat)
        .expect("Expected building the sample matrix to succeed")
}

/// A trait for "anything that owns multiple MarkovChains".
/// - `S` is the state element type (e.g. f64).
/// - `Chain` is the MarkovChain type stored by this struct.
pub trait HasChains<S> {
    type Chain: MarkovChain<S> + std::marker::Send;

    /// Returns a mutable reference to the vector of chains.
    fn chains_mut(&mut self) -> &mut Vec<Self::Chain>;
}

pub trait ChainRunner<S>: HasChains<S>
where
    S: std::clone::Clone
        + num_traits::Zero
        + std::marker::Send
        + std::cmp::PartialEq
        + std::marker::Sync
        + std::fmt::Debug
        + 'static,
{
    /// Runs the chains in parallel for `n_steps` iterations each, returning
    /// every visited state as an array of shape `[n_chains, n_steps, dim]`.
    ///
    /// Nothing is discarded here; callers slice off their own warm-up rows.
    fn run(&mut self, n_steps: usize) -> Array3<S> {
        let results: Vec<Array2<S>> = self
            .chains_mut()
            .par_iter_mut()
            .map(|chain| run_chain(chain, n_steps))
            .collect();

        stack_samples(&results)
    }

    /// Same as [`run`](ChainRunner::run), with one progress bar per chain.
    fn run_progress(&mut self, n_steps: usize) -> Array3<S> {
        let multi = MultiProgress::new();
        let pb_style = ProgressStyle::default_bar()
            .template("{prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-");

        let results: Vec<Array2<S>> = self
            .chains_mut()
            .par_iter_mut()
            .enumerate()
            .map(|(i, chain)| {
                let pb = multi.add(ProgressBar::new(n_steps as u64));
                pb.set_prefix(format!("Chain {i}"));
                pb.set_style(pb_style.clone());

                let samples = run_chain_with_progress(chain, n_steps, &pb);

                pb.finish_with_message("Done!");

                samples
            })
            .collect();

        stack_samples(&results)
    }

    /// Runs the chains in parallel until `n_steps` iterations have completed
    /// or `stop` is set from another thread.
    ///
    /// Chains may observe the flag at different iterations, so each returns
    /// its own matrix and the row counts need not agree.
    fn run_until(&mut self, n_steps: usize, stop: &AtomicBool) -> Vec<Array2<S>> {
        self.chains_mut()
            .par_iter_mut()
            .map(|chain| run_chain_until(chain, n_steps, stop))
            .collect()
    }
}

fn stack_samples<S: Clone>(results: &[Array2<S>]) -> Array3<S> {
    let views: Vec<_> = results.iter().map(|m| m.view()).collect();
    ndarray::stack(Axis(0), &views).expect("Expected stacking chain samples to succeed")
}

impl<
        S: std::fmt::Debug
            + std::marker::Sync
            + std::cmp::PartialEq
            + std::marker::Send
            + num_traits::Zero
            + std::clone::Clone
            + 'static,
        T: HasChains<S>,
    > ChainRunner<S> for T
{
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A chain that deterministically counts upward, for exercising the
    /// runners without any randomness.
    #[derive(Clone)]
    struct CountingChain {
        state: Vec<f64>,
        k: f64,
    }

    impl CountingChain {
        fn new() -> Self {
            Self {
                state: vec![0.0, 0.0],
                k: 0.0,
            }
        }
    }

    impl MarkovChain<f64> for CountingChain {
        fn step(&mut self) -> &Vec<f64> {
            self.k += 1.0;
            self.state = vec![self.k, 10.0 * self.k];
            &self.state
        }

        fn current_state(&self) -> &Vec<f64> {
            &self.state
        }
    }

    struct Counters {
        chains: Vec<CountingChain>,
    }

    impl HasChains<f64> for Counters {
        type Chain = CountingChain;

        fn chains_mut(&mut self) -> &mut Vec<Self::Chain> {
            &mut self.chains
        }
    }

    #[test]
    fn test_run_chain_records_every_state() {
        let mut chain = CountingChain::new();
        let out = run_chain(&mut chain, 3);
        assert_eq!(out.shape(), &[3, 2]);
        assert_eq!(out.row(0).to_vec(), vec![1.0, 10.0]);
        assert_eq!(out.row(2).to_vec(), vec![3.0, 30.0]);
    }

    #[test]
    fn test_run_stacks_chains() {
        let mut runner = Counters {
            chains: vec![CountingChain::new(), CountingChain::new()],
        };
        let out = runner.run(4);
        assert_eq!(out.shape(), &[2, 4, 2]);
        // Both chains count identically.
        assert_eq!(out[[0, 3, 1]], 40.0);
        assert_eq!(out[[1, 3, 1]], 40.0);
    }

    #[test]
    fn test_run_until_without_stop_completes() {
        let mut runner = Counters {
            chains: vec![CountingChain::new()],
        };
        let stop = AtomicBool::new(false);
        let out = runner.run_until(5, &stop);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].shape(), &[5, 2]);
    }

    #[test]
    fn test_run_until_preset_stop_yields_no_rows() {
        let mut runner = Counters {
            chains: vec![CountingChain::new(), CountingChain::new()],
        };
        let stop = AtomicBool::new(true);
        let out = runner.run_until(5, &stop);
        for samples in &out {
            assert_eq!(samples.shape(), &[0, 2]);
        }
    }
}
