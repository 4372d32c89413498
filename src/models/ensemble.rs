//! Tree-ensemble regressors: gradient boosting and a random forest.
//!
//! Both are small by ML-library standards because the training sets are
//! small (a few dozen monthly rows). Boosting uses no row/feature sampling
//! and is fully deterministic; the forest draws bootstrap samples and
//! per-tree feature subsets from a caller-seeded RNG, so a fixed seed gives
//! a fixed model.

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::error::AppError;
use crate::models::tree::{RegressionTree, TreeParams};
use crate::models::{N_FEATURES, RegressionForecaster, RegressionModel};

/// Features a forest tree may split on: ceil(sqrt(N_FEATURES)).
const FOREST_FEATURES_PER_TREE: usize = 3;

fn check_training_input(features: &[[f64; N_FEATURES]], target: &[f64]) -> Result<(), AppError> {
    if features.is_empty() {
        return Err(AppError::model("Cannot fit a regressor on zero rows."));
    }
    if features.len() != target.len() {
        return Err(AppError::model(format!(
            "Feature/target length mismatch: {} rows vs {} targets.",
            features.len(),
            target.len()
        )));
    }
    Ok(())
}

/// Gradient boosting over shallow regression trees.
#[derive(Debug, Clone, Copy)]
pub struct GradientBoost {
    pub n_trees: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
}

impl Default for GradientBoost {
    fn default() -> Self {
        Self {
            n_trees: 100,
            learning_rate: 0.1,
            max_depth: 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GradientBoostModel {
    base: f64,
    learning_rate: f64,
    trees: Vec<RegressionTree>,
}

impl RegressionForecaster for GradientBoost {
    type Model = GradientBoostModel;

    fn fit(
        &self,
        features: &[[f64; N_FEATURES]],
        target: &[f64],
    ) -> Result<Self::Model, AppError> {
        check_training_input(features, target)?;
        if self.n_trees == 0 || !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(AppError::model(format!(
                "Invalid boosting parameters: n_trees={}, learning_rate={}.",
                self.n_trees, self.learning_rate
            )));
        }

        let n = features.len();
        let base = target.iter().sum::<f64>() / n as f64;
        let indices: Vec<usize> = (0..n).collect();
        let all_features: Vec<usize> = (0..N_FEATURES).collect();
        let params = TreeParams {
            max_depth: self.max_depth,
            min_leaf: 2,
        };

        let mut predictions = vec![base; n];
        let mut trees = Vec::with_capacity(self.n_trees);

        for _ in 0..self.n_trees {
            let residuals: Vec<f64> = target
                .iter()
                .zip(&predictions)
                .map(|(y, p)| y - p)
                .collect();
            let tree = RegressionTree::fit(features, &residuals, &indices, &all_features, params);
            for (i, prediction) in predictions.iter_mut().enumerate() {
                *prediction += self.learning_rate * tree.predict_one(&features[i]);
            }
            trees.push(tree);
        }

        Ok(GradientBoostModel {
            base,
            learning_rate: self.learning_rate,
            trees,
        })
    }
}

impl RegressionModel for GradientBoostModel {
    fn predict(&self, features: &[[f64; N_FEATURES]]) -> Vec<f64> {
        features
            .iter()
            .map(|row| {
                self.base
                    + self.learning_rate
                        * self
                            .trees
                            .iter()
                            .map(|t| t.predict_one(row))
                            .sum::<f64>()
            })
            .collect()
    }
}

/// Bagged regression trees with per-tree feature subsets.
#[derive(Debug, Clone, Copy)]
pub struct RandomForest {
    pub n_trees: usize,
    pub max_depth: usize,
    pub seed: u64,
}

impl Default for RandomForest {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 3,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RandomForestModel {
    trees: Vec<RegressionTree>,
}

impl RegressionForecaster for RandomForest {
    type Model = RandomForestModel;

    fn fit(
        &self,
        features: &[[f64; N_FEATURES]],
        target: &[f64],
    ) -> Result<Self::Model, AppError> {
        check_training_input(features, target)?;
        if self.n_trees == 0 {
            return Err(AppError::model("Random forest needs at least one tree."));
        }

        let n = features.len();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let params = TreeParams {
            max_depth: self.max_depth,
            min_leaf: 2,
        };

        let mut trees = Vec::with_capacity(self.n_trees);
        for _ in 0..self.n_trees {
            let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            let feature_pool: Vec<usize> =
                rand::seq::index::sample(&mut rng, N_FEATURES, FOREST_FEATURES_PER_TREE).into_vec();
            trees.push(RegressionTree::fit(
                features,
                target,
                &bootstrap,
                &feature_pool,
                params,
            ));
        }

        Ok(RandomForestModel { trees })
    }
}

impl RegressionModel for RandomForestModel {
    fn predict(&self, features: &[[f64; N_FEATURES]]) -> Vec<f64> {
        features
            .iter()
            .map(|row| {
                self.trees.iter().map(|t| t.predict_one(row)).sum::<f64>()
                    / self.trees.len() as f64
            })
            .collect()
    }
}
