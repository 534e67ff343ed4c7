//! Generated identifiers and derived host names.

use ebmock_schema::{EnvironmentId, RequestId};
use rand::Rng;
use uuid::Uuid;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Length of the random suffix in environment ids, CNAMEs, and endpoints.
pub const SUFFIX_LEN: usize = 10;

pub fn random_lowercase<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(LOWERCASE[rng.gen_range(0..LOWERCASE.len())]))
        .collect()
}

/// `e-` followed by ten random lowercase letters.
pub fn generate_environment_id<R: Rng + ?Sized>(rng: &mut R) -> EnvironmentId {
    EnvironmentId::new(format!("e-{}", random_lowercase(rng, SUFFIX_LEN)))
}

/// CNAME for a new environment: the caller's prefix when given, otherwise the
/// environment name with a random suffix.
pub fn derive_cname<R: Rng + ?Sized>(
    rng: &mut R,
    environment_name: &str,
    prefix: Option<&str>,
    domain: &str,
) -> String {
    match prefix {
        Some(prefix) => format!("http://{prefix}.{domain}"),
        None => format!(
            "http://{environment_name}-{}.{domain}",
            random_lowercase(rng, SUFFIX_LEN)
        ),
    }
}

pub fn derive_endpoint_url<R: Rng + ?Sized>(
    rng: &mut R,
    environment_id: &EnvironmentId,
    domain: &str,
) -> String {
    format!(
        "awseb-{environment_id}-{}.{domain}",
        random_lowercase(rng, SUFFIX_LEN)
    )
}

pub fn generate_request_id() -> RequestId {
    RequestId::new(Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use regex::Regex;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn environment_id_shape() {
        let re = Regex::new(r"^e-[a-z]{10}$").unwrap();
        let mut rng = rng();
        for _ in 0..100 {
            let id = generate_environment_id(&mut rng);
            assert!(re.is_match(&id), "{id}");
        }
    }

    #[test]
    fn same_seed_same_ids() {
        let a = generate_environment_id(&mut rng());
        let b = generate_environment_id(&mut rng());
        assert_eq!(a, b);
    }

    #[test]
    fn cname_uses_prefix_when_given() {
        let cname = derive_cname(&mut rng(), "myenv", Some("myprefix"), "elasticbeanstalk.com");
        assert_eq!(cname, "http://myprefix.elasticbeanstalk.com");
    }

    #[test]
    fn cname_falls_back_to_name_and_suffix() {
        let re = Regex::new(r"^http://myenv-[a-z]{10}\.elasticbeanstalk\.com$").unwrap();
        let cname = derive_cname(&mut rng(), "myenv", None, "elasticbeanstalk.com");
        assert!(re.is_match(&cname), "{cname}");
    }

    #[test]
    fn endpoint_url_embeds_environment_id() {
        let id = EnvironmentId::new("e-abcdefghij");
        let re = Regex::new(r"^awseb-e-abcdefghij-[a-z]{10}\.elb\.amazonaws\.com$").unwrap();
        let url = derive_endpoint_url(&mut rng(), &id, "elb.amazonaws.com");
        assert!(re.is_match(&url), "{url}");
    }

    #[test]
    fn request_ids_are_uuids() {
        let a = generate_request_id();
        let b = generate_request_id();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }
}
