use geo::{Geometry, GeometryCollection, LineString, MultiPolygon, Point, Polygon};
use local_spatial_id::quantize::bbox_to_local_tile;
use local_spatial_id::{
    BoundingBox3D, GlobalSpatialId, Namespace, NamespaceBuilder, Point3d, SpatialIdError,
    ZFXYTile,
};

fn georeferenced() -> Namespace {
    Namespace::builder()
        .id("edge")
        .scale(1_000.0)
        .origin(35.0, 139.0)
        .build()
        .expect("Failed to create namespace")
}

/// Test 1: Malformed cell strings
#[test]
fn test_malformed_cell_strings() {
    let ns = Namespace::new(1_000.0).expect("Failed to create namespace");

    for input in ["/", "/1/0", "/a/0/0/0", "/1/0/0/0/", "/1/-1/0/0", "9x", "/1/0/0/0/0"] {
        assert!(
            matches!(ns.cell(input), Err(SpatialIdError::ParseFailure(_))),
            "{:?} should not parse",
            input
        );
    }

    // coordinates past the edge of their zoom level
    assert!(ns.cell("/1/2/0/0").is_err());
    assert!(ns.cell("/0/0/0/1").is_err());
}

/// Test 2: Zoom levels past the deepest supported level
#[test]
fn test_zoom_limits() {
    let ns = Namespace::new(1_000.0).expect("Failed to create namespace");

    assert!(ns.cell_at_zoom(Point3d::new(1.0, 1.0, 1.0), 28).is_ok());
    assert!(matches!(
        ns.cell_at_zoom(Point3d::new(1.0, 1.0, 1.0), 29),
        Err(SpatialIdError::InvalidInput(_))
    ));
    assert!(NamespaceBuilder::new().scale(1.0).default_zoom(29).build().is_err());

    let root = ns.cell("/0/0/0/0").expect("root");
    assert!(matches!(
        root.children_at_zoom(22),
        Err(SpatialIdError::InvalidNavigation(_))
    ));
    let deep = ns.cell("/28/0/0/0").expect("deepest cell");
    assert!(matches!(deep.children(), Err(SpatialIdError::InvalidNavigation(_))));
    assert!(root.parent().is_err());
}

/// Test 3: Movement wraps on every axis
#[test]
fn test_movement_wraps() {
    let ns = Namespace::new(1_000.0).expect("Failed to create namespace");
    let corner = ns.cell("/3/0/0/0").expect("corner cell");

    assert_eq!(corner.west(1).zfxy_str(), "/3/0/7/0");
    assert_eq!(corner.north(1).zfxy_str(), "/3/0/0/7");
    assert_eq!(corner.down(1).zfxy_str(), "/3/7/0/0");
    assert_eq!(corner.east(8), corner);
    assert_eq!(corner.up(i64::MAX).zfxy_str(), "/3/7/0/0");
    assert_eq!(corner.move_by(i64::MIN, i64::MIN, i64::MIN), corner);

    let root = ns.cell("/0/0/0/0").expect("root");
    assert_eq!(root.east(5), root);
}

/// Test 4: Non-finite input is rejected rather than quantized
#[test]
fn test_non_finite_input() {
    let ns = georeferenced();

    assert!(matches!(
        ns.cell(Point3d::new(f64::NAN, 0.0, 0.0)),
        Err(SpatialIdError::InvalidInput(_))
    ));
    assert!(matches!(
        ns.cell_from_wgs84(&Point3d::new(139.0, f64::INFINITY, 0.0), 5),
        Err(SpatialIdError::InvalidInput(_))
    ));
    assert!(matches!(
        ns.cells_from_geometry_in_altitude_range(
            3,
            &Point::new(139.0, 35.0).into(),
            f64::NAN,
            1.0
        ),
        Err(SpatialIdError::InvalidInput(_))
    ));
}

/// Test 5: Points and volumes outside the namespace are clamped onto its
/// boundary cells
#[test]
fn test_clamping_at_boundaries() {
    let ns = Namespace::builder()
        .scale(1_000.0)
        .scale_height(100.0)
        .build()
        .expect("Failed to create namespace");

    let far_corner = ns
        .cell_at_zoom(Point3d::new(1_000.0, 1_000.0, 100.0), 2)
        .expect("clamped");
    assert_eq!(far_corner.zfxy_str(), "/2/3/3/3");

    let below = ns
        .cell_at_zoom(Point3d::new(-1.0, -1.0, -1.0), 2)
        .expect("clamped");
    assert_eq!(below.zfxy_str(), "/2/0/0/0");
}

/// Test 6: WGS84 points outside the namespace are an error
#[test]
fn test_wgs84_outside_namespace() {
    let ns = georeferenced();

    assert!(ns.cell_from_wgs84(&Point3d::new(139.0, 35.0, 10.0), 4).is_ok());
    // roughly 9km east of a 1km namespace
    assert!(matches!(
        ns.cell_from_wgs84(&Point3d::new(139.1, 35.0, 10.0), 4),
        Err(SpatialIdError::OutOfBounds(_))
    ));
    // above the ceiling
    assert!(matches!(
        ns.cell_from_wgs84(&Point3d::new(139.0, 35.0, 1_000.0), 4),
        Err(SpatialIdError::OutOfBounds(_))
    ));
}

/// Test 7: Geometry collections and empty geometries are not supported
#[test]
fn test_unsupported_geometries() {
    let ns = georeferenced();
    let collection = Geometry::GeometryCollection(GeometryCollection(vec![
        Point::new(139.0, 35.0).into(),
    ]));

    assert!(matches!(
        ns.cells_from_geometry(3, &collection),
        Err(SpatialIdError::UnsupportedGeometry(_))
    ));
    assert!(matches!(
        ns.bounding_cell_from_geometry(&collection),
        Err(SpatialIdError::UnsupportedGeometry(_))
    ));

    let cell = ns.cell("/1/0/0/0").expect("cell");
    assert!(matches!(
        cell.contains(&collection),
        Err(SpatialIdError::UnsupportedGeometry(_))
    ));

    let empty = Geometry::MultiPolygon(MultiPolygon::new(vec![]));
    assert!(matches!(
        ns.cells_from_geometry(3, &empty),
        Err(SpatialIdError::InvalidInput(_))
    ));
}

/// Test 8: Geometries with coordinates that are not longitude/latitude
#[test]
fn test_invalid_geographic_coordinates() {
    let ns = georeferenced();
    let projected: Geometry = Polygon::new(
        LineString::from(vec![
            (500_000.0, 4_000_000.0),
            (500_100.0, 4_000_000.0),
            (500_100.0, 4_000_100.0),
            (500_000.0, 4_000_000.0),
        ]),
        vec![],
    )
    .into();

    assert!(matches!(
        ns.cells_from_geometry(3, &projected),
        Err(SpatialIdError::InvalidInput(_))
    ));
}

/// Test 9: A single point yields exactly the cells holding it
#[test]
fn test_point_geometry() {
    let ns = georeferenced();
    let point = Point3d::new(139.001, 35.001, 0.0);
    let geometry: Geometry = point.to_2d().into();

    let cells = ns
        .cells_from_geometry_in_altitude_range(5, &geometry, 0.0, 0.0)
        .expect("cells");
    let holder = ns.cell_from_wgs84(&point, 5).expect("holder");
    assert!(cells.contains(&holder));
    // only cells sharing the point's corner or edge can also match
    assert!(cells.len() <= 4);
}

/// Test 10: Namespace identities and origins are validated
#[test]
fn test_namespace_validation() {
    assert!(NamespaceBuilder::new().scale(1.0).id("").build().is_err());
    assert!(
        NamespaceBuilder::new()
            .scale(1.0)
            .id("x".repeat(300))
            .build()
            .is_err()
    );
    assert!(
        NamespaceBuilder::new()
            .scale(1.0)
            .origin(0.0, 181.0)
            .build()
            .is_err()
    );
    assert!(
        NamespaceBuilder::new()
            .scale(1.0)
            .origin(35.0, 139.0)
            .origin_angle(f64::NAN)
            .build()
            .is_err()
    );
    assert!(NamespaceBuilder::new().scale(0.0).build().is_err());
}

/// Test 11: Global tiles below sea level
#[test]
fn test_global_tiles_below_sea_level() {
    let tile = GlobalSpatialId::new(25, -1, 0, 0).expect("valid tile");
    assert_eq!(tile.alt_min(), -1.0);
    assert_eq!(tile.alt_max(), 0.0);
    assert!(tile.tilehash().starts_with('-'));
    assert_eq!(
        GlobalSpatialId::from_tilehash(&tile.tilehash()).expect("hash"),
        tile
    );

    assert!(GlobalSpatialId::new(1, -3, 0, 0).is_err());
    assert!(GlobalSpatialId::new(1, -2, 0, 0).is_ok());
    assert!(GlobalSpatialId::new(1, 0, 2, 0).is_err());
}

/// Test 12: Tile hashes of zoom 0 and of the deepest zoom
#[test]
fn test_tilehash_extremes() {
    let root = ZFXYTile::root();
    assert_eq!(root.tilehash(), "");
    assert_eq!(ZFXYTile::from_tilehash("").expect("root hash"), root);

    let side = 1u64 << 28;
    let deep = ZFXYTile::new(28, side - 1, side - 1, side - 1).expect("deep tile");
    assert_eq!(deep.tilehash().len(), 28);
    assert_eq!(deep.tilehash(), "8".repeat(28));
    assert_eq!(ZFXYTile::from_tilehash(&deep.tilehash()).expect("hash"), deep);
}

/// Test 13: Volumes with a NaN bound are rejected, whichever side holds it
#[test]
fn test_nan_volumes() {
    let ns = Namespace::new(1_000.0).expect("Failed to create namespace");

    for volume in [
        BoundingBox3D::new(0.0, 0.0, 0.0, 1.0, 1.0, f64::NAN),
        BoundingBox3D::new(f64::NAN, 0.0, 0.0, 1.0, 1.0, 1.0),
        BoundingBox3D::new(0.0, 0.0, 0.0, 1.0, f64::NAN, 1.0),
    ] {
        assert!(
            matches!(ns.cell(volume), Err(SpatialIdError::InvalidInput(_))),
            "{:?} should be rejected",
            volume
        );
    }
    assert!(ns.cell(BoundingBox3D::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0)).is_ok());
}

/// Test 14: Unclamped volumes reaching outside the namespace
#[test]
fn test_unclamped_volume_outside_namespace() {
    let one_corner_out = BoundingBox3D::new(100.0, 100.0, 10.0, 1_200.0, 300.0, 20.0);
    assert!(matches!(
        bbox_to_local_tile(1_000.0, 1_000.0, &one_corner_out, 20, false),
        Err(SpatialIdError::OutOfBounds(_))
    ));
    let below_floor = BoundingBox3D::new(100.0, 100.0, -5.0, 200.0, 200.0, 20.0);
    assert!(matches!(
        bbox_to_local_tile(1_000.0, 1_000.0, &below_floor, 20, false),
        Err(SpatialIdError::OutOfBounds(_))
    ));

    // clamped, the far corner lands in the last column and the volume
    // straddles the centre line
    let clamped =
        bbox_to_local_tile(1_000.0, 1_000.0, &one_corner_out, 20, true).expect("clamped");
    assert_eq!(clamped, ZFXYTile::root());
}
