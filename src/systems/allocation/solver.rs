use nalgebra::Vector3;
use tracing::{debug, trace};

use crate::{
    components::{
        AllocationResult, Engine, EngineScratch, IterationRecord, Termination, TorqueClamp,
    },
    resources::AllocatorConfig,
    utils::{clamp01, ratio01, AllocError, TorqueVectorExt},
};

/// Margin applied when raising the vertical-speed factor to counter idle torque
const ANTI_IDLE_MARGIN: f64 = 1.2;

/// Iterative throttle-limit search reproducing a demanded torque.
///
/// The allocator owns the per-engine working state, so one instance can be
/// reused across many calls on the same (or a different) engine set.
#[derive(Debug, Clone, Default)]
pub struct TorqueAllocator {
    config: AllocatorConfig,
    scratch: Vec<EngineScratch>,
}

impl TorqueAllocator {
    pub fn new(config: AllocatorConfig) -> Self {
        Self {
            config,
            scratch: Vec::new(),
        }
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Working state left by the last call
    pub fn scratch(&self) -> &[EngineScratch] {
        &self.scratch
    }

    /// Limits committed by the last call
    pub fn limits(&self) -> Vec<f64> {
        self.scratch.iter().map(|s| s.limit).collect()
    }

    /// Searches for per-engine throttle limits whose net torque matches
    /// `demand` in magnitude and direction.
    ///
    /// The demand is first clamped into the engines' per-axis envelope, and
    /// all errors are measured against that clamped target.
    pub fn allocate(
        &mut self,
        engines: &[Engine],
        demand: &Vector3<f64>,
    ) -> Result<AllocationResult, AllocError> {
        self.config.validate()?;
        if engines.is_empty() {
            return Err(AllocError::EmptyEngineSet);
        }
        if !demand.iter().all(|x| x.is_finite()) {
            return Err(AllocError::InvalidDemand(format!(
                "demand must be finite, got {:?}",
                demand
            )));
        }
        if let Some(i) = engines.iter().position(|e| !e.is_finite()) {
            return Err(AllocError::InvalidConfig(format!(
                "engine {} ({}) has non-finite geometry or thrust",
                i, engines[i].name
            )));
        }

        let eps = self.config.convergence_eps;
        let vsf = self.reset(engines);

        let envelope = TorqueClamp::from_torques(self.scratch.iter().map(|s| &s.current_torque));
        let clamped_demand = envelope.clamp(demand);
        let has_manual = engines.iter().any(|e| e.manual);
        debug!(
            "Torque envelope: +{:?} / -{:?}, demand {:?} clamped to {:?}",
            envelope.positive, envelope.negative, demand, clamped_demand
        );

        let mut imbalance = net_torque(engines, &self.scratch, vsf);
        let mut best: Option<(usize, IterationRecord)> = None;
        let mut previous_error: Option<f64> = None;
        let mut trace_records = Vec::new();
        let mut termination = Termination::MaxIterations;
        let mut iterations = 0;

        for i in 0..self.config.max_iterations {
            iterations = i + 1;
            let record = IterationRecord {
                error: (imbalance - clamped_demand).norm(),
                angle_error: if clamped_demand.norm() > 0.0 {
                    imbalance.angle_deg(&clamped_demand)
                } else {
                    0.0
                },
            };
            trace!(
                "Iteration {}: error {:.4}, angle {:.4} deg",
                i,
                record.error,
                record.angle_error
            );
            if self.config.record_trace {
                trace_records.push(record);
            }

            if improves_on(&record, best.as_ref().map(|(_, b)| b)) {
                for s in self.scratch.iter_mut() {
                    s.best_limit = s.limit;
                }
                best = Some((i, record));
            }

            if record.error < eps {
                termination = Termination::Converged;
                break;
            }
            if let Some(previous) = previous_error {
                if (record.error - previous).abs() < eps / 10.0 {
                    termination = Termination::Stalled;
                    break;
                }
            }
            previous_error = Some(record.error);

            if !has_manual {
                renormalize(&mut self.scratch);
            }
            let remaining = clamped_demand - imbalance;
            if !adjust_limits(engines, &mut self.scratch, &remaining, vsf, eps) {
                termination = Termination::NoFeasibleAdjustment;
                break;
            }
            imbalance = net_torque(engines, &self.scratch, vsf);
        }

        for s in self.scratch.iter_mut() {
            s.limit = s.best_limit;
        }
        let (best_iteration, best_record) = best.unwrap_or((
            0,
            IterationRecord {
                error: (imbalance - clamped_demand).norm(),
                angle_error: 0.0,
            },
        ));
        let torque = net_torque(engines, &self.scratch, vsf);

        debug!(
            "Allocation finished after {} iterations ({:?}): error {:.4}, angle {:.4} deg",
            iterations, termination, best_record.error, best_record.angle_error
        );

        Ok(AllocationResult {
            error: best_record.error,
            angle_error: best_record.angle_error,
            limits: self.limits(),
            torque,
            clamped_demand,
            vertical_speed_factor: vsf,
            iterations,
            best_iteration,
            termination,
            trace: trace_records,
        })
    }

    /// Resets the working state for `engines` and returns the vertical-speed
    /// factor to use, raised if idle torque needs countering.
    fn reset(&mut self, engines: &[Engine]) -> f64 {
        self.scratch.clear();
        self.scratch.extend(engines.iter().map(|e| EngineScratch {
            // manual engines always run at full output
            limit: if e.maneuvering && !e.manual { 0.0 } else { 1.0 },
            ..EngineScratch::default()
        }));

        let mut vsf = self.config.vertical_speed_factor;
        let idle_torque: Vector3<f64> = engines.iter().map(|e| e.nominal_torque(0.0)).sum();
        if idle_torque.norm() > 0.0 {
            let anti_idle_torque: Vector3<f64> = engines
                .iter()
                .filter(|e| e.specific_torque.dot(&idle_torque) < 0.0)
                .map(|e| e.nominal_torque(1.0))
                .sum();
            if anti_idle_torque.norm() > 0.0 {
                let required =
                    clamp01(idle_torque.norm() / anti_idle_torque.norm() * ANTI_IDLE_MARGIN);
                if required > vsf {
                    debug!(
                        "Raising vertical-speed factor {:.3} -> {:.3} to counter idle torque {:?}",
                        vsf, required, idle_torque
                    );
                    vsf = required;
                }
            }
        }
        let vsf = clamp01(vsf);

        for (engine, s) in engines.iter().zip(self.scratch.iter_mut()) {
            s.torque_ratio = engine.torque_ratio();
            s.current_torque = engine.nominal_torque(engine.vsf(vsf));
        }
        vsf
    }
}

/// Runs a single allocation with a fresh allocator
pub fn allocate(
    engines: &[Engine],
    demand: &Vector3<f64>,
    config: AllocatorConfig,
) -> Result<AllocationResult, AllocError> {
    TorqueAllocator::new(config).allocate(engines, demand)
}

/// Net torque of `engines` at their current limits
pub fn net_torque(engines: &[Engine], scratch: &[EngineScratch], vsf: f64) -> Vector3<f64> {
    engines
        .iter()
        .zip(scratch)
        .map(|(e, s)| e.nominal_torque(e.vsf(vsf) * s.limit))
        .sum()
}

/// Ranking of an iteration against the best so far. A perfectly aligned
/// iteration wins on magnitude alone; otherwise the combined score decides.
fn improves_on(record: &IterationRecord, best: Option<&IterationRecord>) -> bool {
    match best {
        None => true,
        Some(best) => {
            (record.angle_error <= 0.0 && record.error < best.error)
                || record.error + record.angle_error < best.error + best.angle_error
        }
    }
}

/// Rescales limits so the least constrained engine sits at 1.
fn renormalize(scratch: &mut [EngineScratch]) {
    let max_limit = scratch.iter().map(|s| s.limit).fold(0.0, f64::max);
    if max_limit > 0.0 {
        for s in scratch.iter_mut() {
            s.limit = clamp01(s.limit / max_limit);
        }
    }
}

/// One pass of the limit search towards `remaining`.
///
/// Engines whose full-limit torque opposes the remaining demand are throttled
/// back; maneuvering engines aligned with it are throttled up, starting from
/// `eps` if they were idle. Returns `false` when no engine can move the net
/// torque, in which case no limit was scaled.
pub fn adjust_limits(
    engines: &[Engine],
    scratch: &mut [EngineScratch],
    remaining: &Vector3<f64>,
    vsf: f64,
    eps: f64,
) -> bool {
    let target = remaining.safe_normalize();
    let mut compensating = Vector3::zeros();
    let mut maneuvering = Vector3::zeros();

    for (engine, s) in engines.iter().zip(scratch.iter_mut()) {
        if engine.manual {
            s.limit_tmp = 0.0;
            continue;
        }
        s.limit_tmp = match (target, s.current_torque.safe_normalize()) {
            (Some(t), Some(c)) => -c.dot(&t) * s.torque_ratio,
            _ => 0.0,
        };
        if s.limit_tmp > 0.0 {
            compensating += engine.nominal_torque(engine.vsf(vsf) * s.limit);
        } else if engine.maneuvering {
            if s.limit == 0.0 {
                s.limit = clamp01(eps);
            }
            maneuvering += engine.nominal_torque(engine.vsf(vsf) * s.limit);
        } else {
            s.limit_tmp = 0.0;
        }
    }

    let compensating_norm = compensating.norm();
    let maneuvering_norm = maneuvering.norm();
    if compensating_norm < eps && maneuvering_norm == 0.0 {
        return false;
    }

    let remaining_norm = remaining.norm();
    let compensating_factor = ratio01(remaining_norm, compensating_norm);
    let maneuvering_factor = ratio01(remaining_norm, maneuvering_norm);

    for (engine, s) in engines.iter().zip(scratch.iter_mut()) {
        if engine.manual {
            continue;
        }
        let factor = if s.limit_tmp < 0.0 {
            maneuvering_factor
        } else {
            compensating_factor
        };
        s.limit = clamp01(s.limit * (1.0 - s.limit_tmp * factor));
    }
    true
}
