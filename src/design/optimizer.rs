//! Variant generation, evaluation and ranking.

use std::cmp::Ordering;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{DesignerConfig, EngineConfig};
use crate::equipment::{
    Battery, BatteryFilter, EquipmentCatalog, Inverter, InverterFilter, Panel, PanelFilter,
};
use crate::error::{DesignError, InfeasibleDesignError, ValidationError};
use crate::sim::engine::validate_location;
use crate::sim::financial::FinancialOptions;
use crate::sim::types::{InverterType, ModuleType, SystemSpecification, TrackingType};
use crate::sim::ProductionSimulator;
use crate::weather::{WeatherMonth, validate_weather};

use super::financing::FinancingOptions;
use super::layout::RoofLayout;
use super::requirements::{DesignRequirements, OptimizationGoal};
use super::scoring::{Score, ScoreInputs};
use super::selection::{panel_count, select_battery, select_inverter, select_panel};
use super::types::{
    Component, CostBreakdown, DesignComponents, DesignResult, DesignVariant, EnergyAnalysis,
    MonthlyBalance,
};

/// One equipment combination awaiting simulation.
#[derive(Debug, Clone)]
struct Candidate {
    panels: Component<Panel>,
    inverters: Component<Inverter>,
    batteries: Option<Component<Battery>>,
}

/// Searches an equipment catalog for the best system for a household.
///
/// Holds configuration and a borrowed catalog only; one designer may serve
/// any number of requests, concurrently if the catalog allows.
pub struct SystemDesigner<'a, C: EquipmentCatalog> {
    catalog: &'a C,
    simulator: ProductionSimulator,
    financial: FinancialOptions,
    config: DesignerConfig,
}

impl<'a, C: EquipmentCatalog> SystemDesigner<'a, C> {
    /// A designer with default model constants.
    pub fn new(catalog: &'a C) -> Self {
        Self::with_config(catalog, &EngineConfig::default())
    }

    pub fn with_config(catalog: &'a C, config: &EngineConfig) -> Self {
        Self {
            catalog,
            simulator: ProductionSimulator::new(config.simulation.clone()),
            financial: config.financial.clone(),
            config: config.designer.clone(),
        }
    }

    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    /// Designs a system for `requirements` under `weather`.
    ///
    /// # Errors
    ///
    /// * `DesignError::Validation` if the request, location or weather is
    ///   malformed. Nothing is generated in that case.
    /// * `DesignError::Infeasible` if no equipment combination yields a
    ///   simulated variant.
    pub fn design(
        &self,
        requirements: &DesignRequirements,
        weather: &[WeatherMonth],
    ) -> Result<DesignResult, DesignError> {
        requirements.validate()?;
        validate_location(&requirements.location)?;
        validate_weather(weather)?;

        let target_kw = self.target_size_kw(requirements);
        info!(
            annual_usage = requirements.annual_usage(),
            target_kw, "sizing design"
        );

        let candidates = self.candidates(requirements, target_kw);
        if candidates.is_empty() {
            return Err(InfeasibleDesignError::new(
                "no in-stock panel and inverter combination matches the requested types",
            )
            .into());
        }

        #[cfg(feature = "parallel")]
        let evaluated: Vec<_> = candidates
            .par_iter()
            .map(|c| self.evaluate(requirements, weather, c))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let evaluated: Vec<_> = candidates
            .iter()
            .map(|c| self.evaluate(requirements, weather, c))
            .collect();

        let mut variants: Vec<DesignVariant> = evaluated
            .into_iter()
            .zip(&candidates)
            .filter_map(|(result, c)| match result {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!(
                        panel = %c.panels.item.model,
                        inverter = %c.inverters.item.model,
                        error = %e,
                        "variant failed simulation"
                    );
                    None
                }
            })
            .collect();

        if variants.is_empty() {
            return Err(InfeasibleDesignError::new(format!(
                "all {} equipment combinations failed simulation",
                candidates.len()
            ))
            .into());
        }

        rank_variants(&mut variants, requirements.preferences.goals.goal);
        let mut ranked = variants.into_iter();
        let Some(design) = ranked.next() else {
            return Err(InfeasibleDesignError::new("no variants left after ranking").into());
        };
        let alternative_designs: Vec<_> = ranked.take(self.config.alternatives).collect();

        let layout = requirements.preferences.roof.as_ref().map(|roof| {
            RoofLayout::plan(
                &design.components.panels.item,
                design.components.panels.quantity,
                roof,
                design.system_specs.tilt,
                design.system_specs.azimuth,
                self.config.row_spacing_m,
                self.config.panel_spacing_m,
            )
        });
        if layout.as_ref().is_some_and(|l| !l.fits) {
            warn!(
                panels = design.components.panels.quantity,
                "selected array does not fit the roof"
            );
        }

        let financing = requirements
            .utility_rates
            .as_ref()
            .and(design.production.financial.as_ref())
            .map(|analysis| {
                FinancingOptions::from_analysis(
                    analysis,
                    self.config.loan_rate,
                    self.config.loan_term_years,
                )
            });

        info!(
            panel = %design.components.panels.item.model,
            inverter = %design.components.inverters.item.model,
            dc_kw = design.system_specs.dc_capacity_kw,
            offset = design.energy_analysis.offset_percentage,
            score = design.score.overall,
            alternatives = alternative_designs.len(),
            "design complete"
        );

        Ok(DesignResult {
            design,
            layout,
            financing,
            alternative_designs,
        })
    }

    /// DC size needed to meet the requested offset (kW).
    pub fn target_size_kw(&self, requirements: &DesignRequirements) -> f64 {
        let offset = requirements.preferences.goals.offset_percentage / 100.0;
        (requirements.annual_usage() * offset / self.config.production_per_kw)
            .max(self.config.min_system_kw)
    }

    fn candidates(&self, requirements: &DesignRequirements, target_kw: f64) -> Vec<Candidate> {
        let prefs = &requirements.preferences;
        let panel_types: Vec<ModuleType> = match prefs.panel_type {
            Some(t) => vec![t],
            None => ModuleType::ALL.to_vec(),
        };
        let inverter_types: Vec<InverterType> = match prefs.inverter_type {
            Some(t) => vec![t],
            None => InverterType::ALL.to_vec(),
        };

        let batteries = if prefs.include_storage {
            let target_kwh = prefs.battery_capacity_kwh.unwrap_or_else(|| {
                requirements.average_daily_usage() * self.config.battery_autonomy_days
            });
            let stock = self.catalog.batteries(&BatteryFilter {
                in_stock_only: true,
                ..BatteryFilter::default()
            });
            let bank = select_battery(&stock, target_kwh);
            if bank.is_none() {
                warn!(target_kwh, "storage requested but no battery is in stock");
            }
            bank
        } else {
            None
        };

        let mut out = Vec::new();
        for module_type in panel_types {
            let panels = self.catalog.panels(&PanelFilter {
                module_type: Some(module_type),
                in_stock_only: true,
                ..PanelFilter::default()
            });
            let Some(panel) = select_panel(&panels, prefs.goals.goal) else {
                debug!(%module_type, "no panels in stock");
                continue;
            };
            let count = panel_count(target_kw, panel.wattage);
            let panels = Component::new(panel.clone(), count);
            let dc_kw = panels.capacity_kw();

            for &inverter_type in &inverter_types {
                let inverters = self.catalog.inverters(&InverterFilter {
                    inverter_type: Some(inverter_type),
                    in_stock_only: true,
                    ..InverterFilter::default()
                });
                let Some(inverters) = select_inverter(
                    &inverters,
                    inverter_type,
                    dc_kw,
                    count,
                    self.config.inverter_sizing_ratio,
                ) else {
                    debug!(%module_type, %inverter_type, "no inverters in stock");
                    continue;
                };
                out.push(Candidate {
                    panels: panels.clone(),
                    inverters,
                    batteries: batteries.clone(),
                });
            }
        }
        out
    }

    fn evaluate(
        &self,
        requirements: &DesignRequirements,
        weather: &[WeatherMonth],
        candidate: &Candidate,
    ) -> Result<DesignVariant, ValidationError> {
        let cfg = &self.config;
        let roof = requirements.preferences.roof.as_ref();
        let panel = &candidate.panels.item;
        let inverter = &candidate.inverters.item;
        let dc_kw = candidate.panels.capacity_kw();

        let shading = roof.map_or(0.0, |r| r.shading_factor);
        let spec = SystemSpecification {
            dc_capacity_kw: dc_kw,
            module_efficiency: panel.efficiency,
            inverter_efficiency: inverter.efficiency,
            system_losses: (cfg.base_system_losses + shading * 100.0).min(cfg.max_system_losses),
            tilt: roof
                .and_then(|r| r.tilt)
                .unwrap_or_else(|| requirements.location.latitude.abs()),
            azimuth: roof.and_then(|r| r.azimuth).unwrap_or(180.0),
            module_type: panel.module_type,
            tracking_type: TrackingType::Fixed,
            inverter_type: inverter.inverter_type,
        };

        let panels_cost = candidate.panels.cost();
        let inverters_cost = candidate.inverters.cost();
        let batteries_cost = candidate.batteries.as_ref().map_or(0.0, |b| b.cost());
        let equipment = panels_cost + inverters_cost + batteries_cost;
        let installation = equipment * cfg.installation_markup;
        let total = equipment + installation;

        let mut financial = self.financial.clone();
        financial.cost_per_watt = total / (dc_kw * 1000.0);
        if let Some(rates) = &requirements.utility_rates {
            financial.electricity_rate = rates.electricity_rate;
            financial.net_metering_rate = rates.net_metering_rate;
            if let Some(increase) = rates.annual_rate_increase {
                financial.annual_rate_increase = increase;
            }
        }

        let production =
            self.simulator
                .simulate(&requirements.location, &spec, weather, Some(&financial))?;

        let annual_usage = requirements.annual_usage();
        let offset_percentage = (production.annual_production / annual_usage * 100.0).min(100.0);
        let monthly = production
            .monthly
            .iter()
            .zip(requirements.monthly_usage)
            .map(|(m, usage)| MonthlyBalance {
                month: m.month,
                production: m.production_kwh,
                usage,
                net: m.production_kwh - usage,
            })
            .collect();

        let budget = requirements
            .budget
            .as_ref()
            .and_then(|b| b.max)
            .filter(|max| *max > 0.0)
            .unwrap_or(cfg.budget_multiplier * dc_kw * 1000.0 * cfg.reference_cost_per_watt);
        let score = Score::evaluate(
            &ScoreInputs {
                total_cost: total,
                budget,
                offset_percentage,
                offset_goal: requirements.preferences.goals.offset_percentage,
                panel,
                inverter,
            },
            &cfg.weights,
        );

        let incentives = production.financial.as_ref().map_or(0.0, |f| f.incentives);
        debug!(
            panel = %panel.model,
            inverter = %inverter.model,
            dc_kw,
            annual_kwh = production.annual_production,
            total_cost = total,
            score = score.overall,
            "evaluated variant"
        );

        Ok(DesignVariant {
            components: DesignComponents {
                panels: candidate.panels.clone(),
                inverters: candidate.inverters.clone(),
                batteries: candidate.batteries.clone(),
            },
            system_specs: spec,
            cost: CostBreakdown {
                panels: panels_cost,
                inverters: inverters_cost,
                batteries: batteries_cost,
                equipment,
                installation,
                total,
                incentives,
                net: total - incentives,
            },
            energy_analysis: EnergyAnalysis {
                annual_production: production.annual_production,
                annual_usage,
                offset_percentage,
                monthly,
            },
            production,
            score,
        })
    }
}

/// Sorts best first: overall score, then net cost or production depending on
/// the goal.
pub fn rank_variants(variants: &mut [DesignVariant], goal: OptimizationGoal) {
    variants.sort_by(|a, b| {
        b.score
            .overall
            .total_cmp(&a.score.overall)
            .then_with(|| tie_break(a, b, goal))
    });
}

fn tie_break(a: &DesignVariant, b: &DesignVariant, goal: OptimizationGoal) -> Ordering {
    match goal {
        OptimizationGoal::MinimizeCost => a.cost.net.total_cmp(&b.cost.net),
        _ => b
            .energy_analysis
            .annual_production
            .total_cmp(&a.energy_analysis.annual_production),
    }
}
