//! Unit tests for qn-core primitives.

#[cfg(test)]
mod ids {
    use crate::{JobId, SourceId, StationId};

    #[test]
    fn handles_index_their_arena() {
        let id = StationId::nth(42);
        assert_eq!(id, StationId(42));
        assert_eq!(id.index(), 42);
        assert_eq!(SourceId::nth(0).index(), 0);
    }

    #[test]
    fn display_names_the_arena() {
        assert_eq!(StationId(7).to_string(), "station#7");
        assert_eq!(SourceId(1).to_string(), "source#1");
        assert_eq!(JobId(3).to_string(), "job#3");
    }
}

#[cfg(test)]
mod time {
    use std::collections::BTreeMap;

    use crate::{SimConfig, SimTime};

    #[test]
    fn arithmetic() {
        let t = SimTime(1.5);
        assert_eq!(t + 2.0, SimTime(3.5));
        assert_eq!(t.after(0.5), SimTime(2.0));
        assert_eq!(SimTime(4.0) - SimTime(1.0), 3.0);
    }

    #[test]
    fn ordering_is_numeric() {
        assert!(SimTime(0.1) < SimTime(0.2));
        assert!(SimTime(10.0) > SimTime(9.999));
        assert_eq!(SimTime(1.0).max(SimTime(2.0)), SimTime(2.0));
    }

    #[test]
    fn usable_as_map_key() {
        let mut m = BTreeMap::new();
        m.insert(SimTime(3.0), "c");
        m.insert(SimTime(1.0), "a");
        m.insert(SimTime(2.0), "b");
        let order: Vec<_> = m.values().copied().collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn display() {
        assert_eq!(SimTime(1.23456).to_string(), "t=1.235");
    }

    #[test]
    fn config_defaults() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.end_time, 8.0);
        assert!(cfg.seed.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn resolve_seed_is_sticky() {
        let mut cfg = SimConfig::default();
        let first = cfg.resolve_seed();
        assert_eq!(cfg.resolve_seed(), first);
        assert_eq!(cfg.seed, Some(first));

        let mut fixed = SimConfig::new(1.0, Some(99));
        assert_eq!(fixed.resolve_seed(), 99);
    }

    #[test]
    fn invalid_horizons_rejected() {
        assert!(SimConfig::new(-1.0, None).validate().is_err());
        assert!(SimConfig::new(f64::NAN, None).validate().is_err());
        assert!(SimConfig::new(f64::INFINITY, None).validate().is_err());
        assert!(SimConfig::new(0.0, None).validate().is_ok());
    }
}

#[cfg(test)]
mod rng {
    use crate::{
        CoreError, ExponentialVariate, SourceId, StationId, Stream, UniformVariate, Variate,
        derive_seed,
    };

    fn draw(v: &mut impl Variate, n: usize) -> Vec<f64> {
        (0..n).map(|_| v.next_variate()).collect()
    }

    #[test]
    fn uniform_same_seed_same_sequence() {
        let mut a = UniformVariate::new(12345);
        let mut b = UniformVariate::new(12345);
        assert_eq!(draw(&mut a, 100), draw(&mut b, 100));
    }

    #[test]
    fn uniform_different_seeds_differ() {
        let mut a = UniformVariate::new(1);
        let mut b = UniformVariate::new(2);
        assert_ne!(draw(&mut a, 10), draw(&mut b, 10));
    }

    #[test]
    fn set_seed_restarts_sequence() {
        let mut v = UniformVariate::new(7);
        let first = draw(&mut v, 20);
        v.set_seed(7);
        assert_eq!(draw(&mut v, 20), first);
        assert_eq!(v.seed(), 7);
    }

    #[test]
    fn uniform_in_unit_interval() {
        let mut v = UniformVariate::new(2024);
        for _ in 0..10_000 {
            let u = v.next_variate();
            assert!((0.0..1.0).contains(&u), "got {u}");
        }
    }

    #[test]
    fn exponential_rejects_bad_rates() {
        for rate in [0.0, -1.0, f64::NAN] {
            let err = ExponentialVariate::new(rate, 1).unwrap_err();
            assert!(matches!(err, CoreError::InvalidParameter { what: "rate", .. }));
        }
    }

    #[test]
    fn exponential_samples_non_negative() {
        let mut v = ExponentialVariate::new(3.0, 5).unwrap();
        assert!(draw(&mut v, 10_000).iter().all(|&x| x >= 0.0 && x.is_finite()));
    }

    #[test]
    fn exponential_mean_converges() {
        for rate in [0.5, 2.0, 9.0] {
            let mut v = ExponentialVariate::new(rate, 31337).unwrap();
            let n = 200_000;
            let mean = draw(&mut v, n).iter().sum::<f64>() / n as f64;
            let expected = 1.0 / rate;
            // Standard error is expected / sqrt(n) ≈ 0.22 % of the mean.
            assert!(
                (mean - expected).abs() < 0.02 * expected,
                "rate {rate}: mean {mean}, expected {expected}"
            );
            assert_eq!(v.mean(), expected);
        }
    }

    #[test]
    fn exponential_matches_inverse_cdf_of_uniform() {
        let mut u = UniformVariate::new(77);
        let mut e = ExponentialVariate::new(4.0, 77).unwrap();
        for _ in 0..100 {
            let expected = -(1.0 - u.next_variate()).ln() / 4.0;
            assert_eq!(e.next_variate(), expected);
        }
    }

    #[test]
    fn instantaneous_always_zero() {
        let mut v = ExponentialVariate::instantaneous(3);
        assert!(v.is_instantaneous());
        assert!(draw(&mut v, 100).iter().all(|&x| x == 0.0));
        assert_eq!(v.mean(), 0.0);
    }

    #[test]
    fn derived_streams_are_distinct() {
        let master = 42;
        let seeds = [
            derive_seed(master, Stream::Arrivals(SourceId(0))),
            derive_seed(master, Stream::Service(StationId(0))),
            derive_seed(master, Stream::Routing(StationId(0))),
            derive_seed(master, Stream::Service(StationId(1))),
        ];
        for i in 0..seeds.len() {
            for j in (i + 1)..seeds.len() {
                assert_ne!(seeds[i], seeds[j]);
            }
        }
        assert_eq!(seeds[1], derive_seed(master, Stream::Service(StationId(0))));
    }
}

#[cfg(test)]
mod job {
    use crate::{Job, JobId, SimTime, SourceId};

    #[test]
    fn sojourn_after_completion() {
        let mut job = Job::new(JobId(1), SourceId(0), SimTime(2.0));
        assert_eq!(job.sojourn(), None);
        assert_eq!(job.age(SimTime(3.0)), 1.0);
        job.complete(SimTime(5.5));
        assert_eq!(job.sojourn(), Some(3.5));
    }
}
