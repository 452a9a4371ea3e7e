#![forbid(unsafe_code)]

//! The fixed set of simulated resources.
//!
//! Eight records, defined at compile time and never mutated. Order matters:
//! it is the grid order, the `1`-`8` key order, and the order diffs appear
//! in a whole-stack plan.

use serde::Serialize;

/// Cosmetic lifecycle label shown on each card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    Active,
    Running,
    Attached,
}

impl ResourceStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Running => "running",
            Self::Attached => "attached",
        }
    }
}

/// A simulated cloud component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub status: ResourceStatus,
    pub details: &'static str,
    pub description: &'static str,
    /// Terraform address, e.g. `aws_vpc.main`.
    pub address: &'static str,
    /// Pre-written plan block for this resource.
    pub diff: &'static str,
}

/// Number of resources in the catalog.
pub const RESOURCE_COUNT: usize = 8;

pub static RESOURCES: [Resource; RESOURCE_COUNT] = [
    Resource {
        id: "vpc",
        name: "VPC",
        icon: "🌐",
        status: ResourceStatus::Active,
        details: "CIDR: 10.0.0.0/16",
        description: "Virtual Private Cloud with DNS support enabled",
        address: "aws_vpc.main",
        diff: "  # aws_vpc.main will be created
  + resource \"aws_vpc\" \"main\" {
      + cidr_block           = \"10.0.0.0/16\"
      + enable_dns_hostnames = true
      + enable_dns_support   = true
      + tags                 = {
          + \"Name\" = \"aws-infra-demo-vpc\"
        }
    }
",
    },
    Resource {
        id: "public-subnet",
        name: "Public Subnet",
        icon: "📡",
        status: ResourceStatus::Active,
        details: "10.0.1.0/24 | ap-south-1a",
        description: "Internet-facing subnet with auto-assign public IP",
        address: "aws_subnet.public",
        diff: "  # aws_subnet.public will be created
  + resource \"aws_subnet\" \"public\" {
      + availability_zone       = \"ap-south-1a\"
      + cidr_block              = \"10.0.1.0/24\"
      + map_public_ip_on_launch = true
      + vpc_id                  = (known after apply)
      + tags                    = {
          + \"Name\" = \"aws-infra-demo-public-subnet\"
        }
    }
",
    },
    Resource {
        id: "private-subnet",
        name: "Private Subnet",
        icon: "🔒",
        status: ResourceStatus::Active,
        details: "10.0.2.0/24 | ap-south-1b",
        description: "Isolated subnet for database and internal services",
        address: "aws_subnet.private",
        diff: "  # aws_subnet.private will be created
  + resource \"aws_subnet\" \"private\" {
      + availability_zone = \"ap-south-1b\"
      + cidr_block        = \"10.0.2.0/24\"
      + vpc_id            = (known after apply)
      + tags              = {
          + \"Name\" = \"aws-infra-demo-private-subnet\"
        }
    }
",
    },
    Resource {
        id: "ec2",
        name: "EC2 Instance",
        icon: "🖥️",
        status: ResourceStatus::Running,
        details: "t3.micro | Docker enabled",
        description: "Web server with Docker pre-installed via user-data",
        address: "aws_instance.web",
        diff: "  # aws_instance.web will be created
  + resource \"aws_instance\" \"web\" {
      + ami                  = \"ami-0c55b159cbfafe1f0\"
      + instance_type        = \"t3.micro\"
      + tags                 = {
          + \"Name\" = \"aws-infra-demo-web-server\"
        }
    }
",
    },
    Resource {
        id: "s3",
        name: "S3 Bucket",
        icon: "📦",
        status: ResourceStatus::Active,
        details: "Versioning enabled",
        description: "Asset storage bucket with IAM-based access control",
        address: "aws_s3_bucket.assets",
        diff: "  # aws_s3_bucket.assets will be created
  + resource \"aws_s3_bucket\" \"assets\" {
      + bucket = \"aws-infra-demo-assets-a1b2c3d4\"
    }
",
    },
    Resource {
        id: "iam",
        name: "IAM Role",
        icon: "🔐",
        status: ResourceStatus::Attached,
        details: "EC2 Instance Profile",
        description: "Least-privilege role for S3 access from EC2",
        address: "aws_iam_role.ec2_s3",
        diff: "  # aws_iam_role.ec2_s3 will be created
  + resource \"aws_iam_role\" \"ec2_s3\" {
      + arn                = (known after apply)
      + assume_role_policy = jsonencode({ Service = \"ec2.amazonaws.com\" })
      + name               = \"aws-infra-demo-ec2-role\"
    }
",
    },
    Resource {
        id: "sg",
        name: "Security Group",
        icon: "🛡️",
        status: ResourceStatus::Active,
        details: "Ports: 22, 80, 443",
        description: "Firewall rules for SSH and HTTP/HTTPS traffic",
        address: "aws_security_group.web",
        diff: "  # aws_security_group.web will be created
  + resource \"aws_security_group\" \"web\" {
      + ingress = [
          + { from_port = 22, to_port = 22, protocol = \"tcp\" },
          + { from_port = 80, to_port = 80, protocol = \"tcp\" },
          + { from_port = 443, to_port = 443, protocol = \"tcp\" },
        ]
      + name    = \"aws-infra-demo-web-sg\"
      + vpc_id  = (known after apply)
    }
",
    },
    Resource {
        id: "igw",
        name: "Internet Gateway",
        icon: "🚪",
        status: ResourceStatus::Attached,
        details: "Attached to VPC",
        description: "Enables internet connectivity for public subnet",
        address: "aws_internet_gateway.main",
        diff: "  # aws_internet_gateway.main will be created
  + resource \"aws_internet_gateway\" \"main\" {
      + vpc_id = (known after apply)
      + tags   = {
          + \"Name\" = \"aws-infra-demo-igw\"
        }
    }
",
    },
];

/// Index of a resource in [`RESOURCES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(usize);

impl ResourceId {
    /// `None` when `index` is past the end of the catalog.
    pub fn new(index: usize) -> Option<Self> {
        if index < RESOURCES.len() {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Look up by the resource's string id.
    pub fn find(id: &str) -> Option<Self> {
        RESOURCES.iter().position(|r| r.id == id).map(Self)
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..RESOURCES.len()).map(Self)
    }

    pub const fn index(self) -> usize {
        self.0
    }

    pub fn resource(self) -> &'static Resource {
        &RESOURCES[self.0]
    }
}

/// Comma-separated list of every id, for error messages and help.
pub fn known_ids() -> String {
    RESOURCES.iter().map(|r| r.id).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = RESOURCES.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), RESOURCES.len());
    }

    #[test]
    fn every_diff_names_its_address() {
        for r in &RESOURCES {
            assert!(
                r.diff.starts_with(&format!("  # {} will be created\n", r.address)),
                "{} diff header",
                r.id
            );
            assert!(r.diff.ends_with("    }\n"), "{} diff footer", r.id);
        }
    }

    #[test]
    fn find_by_id() {
        let ec2 = ResourceId::find("ec2").expect("ec2");
        assert_eq!(ec2.index(), 3);
        assert_eq!(ec2.resource().name, "EC2 Instance");
        assert_eq!(ResourceId::find("rds"), None);
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert!(ResourceId::new(7).is_some());
        assert!(ResourceId::new(8).is_none());
        assert_eq!(ResourceId::all().count(), 8);
    }

    #[test]
    fn statuses_match_page() {
        let statuses: Vec<_> = RESOURCES.iter().map(|r| r.status.label()).collect();
        assert_eq!(
            statuses,
            [
                "active", "active", "active", "running", "active", "attached", "active",
                "attached"
            ]
        );
    }

    #[test]
    fn serializes_status_lowercase() {
        let json = serde_json::to_value(RESOURCES[5]).expect("serialize");
        assert_eq!(json["id"], "iam");
        assert_eq!(json["status"], "attached");
    }
}
