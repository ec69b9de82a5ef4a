//! Candidate selection
//!
//! Three independent stages, each keeping a subset of the previous stage's
//! survivors: old enough, not used by an instance, not used by a launch
//! configuration. Membership checks go through hash sets of image ids.

use super::report::Report;
use crate::error::SweepError;
use chrono::{DateTime, Duration, Utc};
use clemy_common::{Image, InstanceRef, LaunchConfigurationRef, parse_creation_date};
use std::collections::HashSet;

/// Keep images created at least `max_age` before `now`.
///
/// Images whose creation date is missing or unparseable are dropped and an
/// error is recorded on `report`.
pub fn retain_old_enough(
    images: Vec<Image>,
    max_age: Duration,
    now: DateTime<Utc>,
    report: &mut Report,
) -> Vec<Image> {
    images
        .into_iter()
        .filter(|image| {
            let Some(raw) = image.creation_date.as_deref() else {
                report.add_error(SweepError::MissingCreationDate {
                    image_id: image.image_id.clone(),
                });
                return false;
            };
            match parse_creation_date(raw) {
                Ok(created) => now - created >= max_age,
                Err(source) => {
                    report.add_error(SweepError::InvalidCreationDate {
                        image_id: image.image_id.clone(),
                        value: raw.to_string(),
                        source,
                    });
                    false
                }
            }
        })
        .collect()
}

/// Keep images no instance was launched from.
pub fn retain_unused_by_instances(images: Vec<Image>, instances: &[InstanceRef]) -> Vec<Image> {
    let in_use = referenced_ids(instances.iter().map(|i| i.image_id.as_deref()));
    retain_unreferenced(images, &in_use)
}

/// Keep images no launch configuration specifies.
pub fn retain_unused_by_launch_configurations(
    images: Vec<Image>,
    launch_configurations: &[LaunchConfigurationRef],
) -> Vec<Image> {
    let in_use = referenced_ids(launch_configurations.iter().map(|lc| lc.image_id.as_deref()));
    retain_unreferenced(images, &in_use)
}

/// Run all three stages in order and return the deregistration candidates.
pub fn select_candidates(
    images: Vec<Image>,
    instances: &[InstanceRef],
    launch_configurations: &[LaunchConfigurationRef],
    max_age: Duration,
    now: DateTime<Utc>,
    report: &mut Report,
) -> Vec<Image> {
    let images = retain_old_enough(images, max_age, now, report);
    let images = retain_unused_by_instances(images, instances);
    retain_unused_by_launch_configurations(images, launch_configurations)
}

fn referenced_ids<'a>(ids: impl Iterator<Item = Option<&'a str>>) -> HashSet<&'a str> {
    ids.flatten().collect()
}

fn retain_unreferenced(images: Vec<Image>, in_use: &HashSet<&str>) -> Vec<Image> {
    images
        .into_iter()
        .filter(|image| !in_use.contains(image.image_id.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_AGE_DAYS: i64 = 14;

    fn now() -> DateTime<Utc> {
        parse_creation_date("2024-06-30T12:00:00Z").unwrap()
    }

    fn aged(id: &str, days: i64) -> Image {
        Image::new(id, (now() - Duration::days(days)).to_rfc3339())
    }

    fn ids(images: &[Image]) -> Vec<&str> {
        images.iter().map(|i| i.image_id.as_str()).collect()
    }

    fn report() -> Report {
        Report::new("us-east-1", false)
    }

    #[test]
    fn test_age_filter_boundary() {
        let mut report = report();
        let images = vec![
            aged("exactly", MAX_AGE_DAYS),
            aged("older", MAX_AGE_DAYS + 1),
            aged("younger", MAX_AGE_DAYS - 1),
            Image::new(
                "one-second-short",
                (now() - Duration::days(MAX_AGE_DAYS) + Duration::seconds(1)).to_rfc3339(),
            ),
        ];

        let kept = retain_old_enough(images, Duration::days(MAX_AGE_DAYS), now(), &mut report);

        assert_eq!(ids(&kept), vec!["exactly", "older"]);
        assert!(report.errors().is_empty());
    }

    #[test]
    fn test_age_filter_zero_keeps_everything_in_the_past() {
        let mut report = report();
        let kept = retain_old_enough(
            vec![aged("a", 0), aged("b", 400)],
            Duration::zero(),
            now(),
            &mut report,
        );
        assert_eq!(ids(&kept), vec!["a", "b"]);
    }

    #[test]
    fn test_age_filter_drops_and_records_bad_dates() {
        let mut report = report();
        let mut undated = aged("undated", 100);
        undated.creation_date = None;
        let images = vec![
            aged("good", 100),
            Image::new("garbled", "not-a-date"),
            undated,
        ];

        let kept = retain_old_enough(images, Duration::days(MAX_AGE_DAYS), now(), &mut report);

        assert_eq!(ids(&kept), vec!["good"]);
        assert_eq!(report.errors().len(), 2);
        assert!(matches!(
            &report.errors()[0],
            SweepError::InvalidCreationDate { image_id, value, .. }
                if image_id == "garbled" && value == "not-a-date"
        ));
        assert!(matches!(
            &report.errors()[1],
            SweepError::MissingCreationDate { image_id } if image_id == "undated"
        ));
    }

    #[test]
    fn test_instance_filter() {
        let images = vec![aged("ami-1", 30), aged("ami-2", 30)];
        let instances = vec![
            InstanceRef::new("i-1", "ami-1"),
            InstanceRef::new("i-2", "ami-other"),
            InstanceRef {
                instance_id: "i-3".to_string(),
                image_id: None,
            },
        ];

        let kept = retain_unused_by_instances(images, &instances);
        assert_eq!(ids(&kept), vec!["ami-2"]);
    }

    #[test]
    fn test_launch_configuration_filter() {
        let images = vec![aged("ami-1", 30), aged("ami-2", 30), aged("ami-3", 30)];
        let configs = vec![
            LaunchConfigurationRef::new("web", "ami-3"),
            LaunchConfigurationRef {
                name: "empty".to_string(),
                image_id: None,
            },
        ];

        let kept = retain_unused_by_launch_configurations(images, &configs);
        assert_eq!(ids(&kept), vec!["ami-1", "ami-2"]);
    }

    #[test]
    fn test_each_exclusion_alone_and_combined() {
        // M1 used by an instance, M2 by a launch configuration, M3 too young
        let images = vec![aged("M1", 30), aged("M2", 30), aged("M3", 1), aged("M4", 30)];
        let instances = vec![InstanceRef::new("i-1", "M1")];
        let configs = vec![LaunchConfigurationRef::new("lc-1", "M2")];
        let max_age = Duration::days(MAX_AGE_DAYS);

        let mut r = report();
        let only_age = select_candidates(images.clone(), &[], &[], max_age, now(), &mut r);
        assert_eq!(ids(&only_age), vec!["M1", "M2", "M4"]);

        let only_instances =
            select_candidates(images.clone(), &instances, &[], Duration::zero(), now(), &mut r);
        assert_eq!(ids(&only_instances), vec!["M2", "M3", "M4"]);

        let only_configs =
            select_candidates(images.clone(), &[], &configs, Duration::zero(), now(), &mut r);
        assert_eq!(ids(&only_configs), vec!["M1", "M3", "M4"]);

        let all = select_candidates(images, &instances, &configs, max_age, now(), &mut r);
        assert_eq!(ids(&all), vec!["M4"]);
        assert!(r.errors().is_empty());
    }

    #[test]
    fn test_selection_is_idempotent() {
        let images = vec![
            aged("ami-a", 30),
            aged("ami-b", 2),
            aged("ami-c", 60),
            aged("ami-d", 90),
        ];
        let instances = vec![InstanceRef::new("i-1", "ami-c")];
        let configs = vec![LaunchConfigurationRef::new("lc", "ami-x")];
        let max_age = Duration::days(MAX_AGE_DAYS);
        let mut r = report();

        let once = select_candidates(images, &instances, &configs, max_age, now(), &mut r);
        let twice = select_candidates(once.clone(), &instances, &configs, max_age, now(), &mut r);

        assert_eq!(once, twice);
        assert_eq!(ids(&once), vec!["ami-a", "ami-d"]);
    }

    #[test]
    fn test_order_is_preserved() {
        let images: Vec<Image> = (0..10).map(|i| aged(&format!("ami-{i}"), 30)).collect();
        let instances = vec![InstanceRef::new("i-1", "ami-3"), InstanceRef::new("i-2", "ami-7")];
        let kept = retain_unused_by_instances(images, &instances);
        assert_eq!(
            ids(&kept),
            vec!["ami-0", "ami-1", "ami-2", "ami-4", "ami-5", "ami-6", "ami-8", "ami-9"]
        );
    }
}
