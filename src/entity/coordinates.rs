//! Generation of coordinate variable pairs

use crate::{
    constants::{LONG_NAME, STANDARD_NAME, UNITS},
    location::Location,
};

use super::topology::Schema;

struct Axis {
    suffix: &'static str,
    standard_name: &'static str,
    units: &'static str,
    description: &'static str,
}

const CARTESIAN: [Axis; 2] = [
    Axis {
        suffix: "x",
        standard_name: "projection_x_coordinate",
        units: "m",
        description: "x-coordinate",
    },
    Axis {
        suffix: "y",
        standard_name: "projection_y_coordinate",
        units: "m",
        description: "y-coordinate",
    },
];

const SPHERICAL: [Axis; 2] = [
    Axis {
        suffix: "lon",
        standard_name: "longitude",
        units: "degrees_east",
        description: "longitude coordinate",
    },
    Axis {
        suffix: "lat",
        standard_name: "latitude",
        units: "degrees_north",
        description: "latitude coordinate",
    },
];

/// Plans the `<name>_<location>_x/_y` (or `_lon/_lat`) pair over `dimension`.
///
/// `long_name_pattern` holds one `{}` replaced by the axis description.
/// Returns the two variable names, x first; linking them to the topology is up to the caller.
pub(crate) fn define_coordinates(
    schema: &mut Schema,
    location: Location,
    dimension: &str,
    long_name_pattern: &str,
) -> [String; 2] {
    let axes = if schema.spherical {
        &SPHERICAL
    } else {
        &CARTESIAN
    };

    [&axes[0], &axes[1]].map(|axis| {
        let suffix = format!("{}_{}", location.as_str(), axis.suffix);
        schema
            .double_variable(&suffix, &[dimension])
            .attribute(STANDARD_NAME, axis.standard_name)
            .attribute(LONG_NAME, long_name_pattern.replace("{}", axis.description))
            .attribute(UNITS, axis.units)
            .name()
            .to_owned()
    })
}

#[cfg(test)]
mod tests {
    use super::define_coordinates;
    use crate::entity::topology::Schema;
    use crate::location::Location;
    use crate::store::{AttributeRead, ContainerStore, MemoryStore};
    use anyhow::Result;

    #[test]
    fn coordinate_names_follow_spherical_flag() -> Result<()> {
        let mut store = MemoryStore::new();

        for (name, spherical) in [("planar", false), ("globe", true)] {
            let mut schema = Schema::new("Mesh2D", name, 0, spherical)?.fill_values(-999, -999.0);
            schema.mesh_topology("Topology data of 2D mesh", 2);
            let nodes = schema.location_dimension("node_dimension", "nNodes", 2);
            let names = define_coordinates(&mut schema, Location::Node, &nodes, "{} of mesh node");
            schema.role("node_coordinates", &names);
            schema.apply(&mut store)?;
        }

        let x = store.require_variable("planar_node_x")?;
        let units: String = store.read_attribute(x.into(), "units")?;
        let long_name: String = store.read_attribute(x.into(), "long_name")?;
        assert_eq!(units, "m");
        assert_eq!(long_name, "x-coordinate of mesh node");

        let lat = store.require_variable("globe_node_lat")?;
        let standard_name: String = store.read_attribute(lat.into(), "standard_name")?;
        let fill: f64 = store.read_attribute(lat.into(), "_FillValue")?;
        assert_eq!(standard_name, "latitude");
        float_cmp::assert_approx_eq!(f64, fill, -999.0, epsilon = 0.000_1);

        let globe = store.require_variable("globe")?;
        let coordinates: String = store.read_attribute(globe.into(), "node_coordinates")?;
        assert_eq!(coordinates, "globe_node_lon globe_node_lat");

        Ok(())
    }
}
