//! In-memory DICOM fixtures for tests.
use dicom_core::{dicom_value, DataElement, PrimitiveValue, VR};
use dicom_dictionary_std::{tags, uids};
use dicom_object::{FileMetaTableBuilder, InMemDicomObject};

pub const SOP_INSTANCE_UID: &str = "2.25.1234567";

fn base_elements(rows: u16, columns: u16) -> Vec<DataElement<InMemDicomObject>> {
    vec![
        DataElement::new(
            tags::SOP_CLASS_UID,
            VR::UI,
            PrimitiveValue::from(uids::SECONDARY_CAPTURE_IMAGE_STORAGE),
        ),
        DataElement::new(
            tags::SOP_INSTANCE_UID,
            VR::UI,
            PrimitiveValue::from(SOP_INSTANCE_UID),
        ),
        DataElement::new(tags::PATIENT_NAME, VR::PN, PrimitiveValue::from("Doe^John")),
        DataElement::new(tags::MODALITY, VR::CS, PrimitiveValue::from("OT")),
        DataElement::new(tags::SAMPLES_PER_PIXEL, VR::US, dicom_value!(U16, [1])),
        DataElement::new(
            tags::PHOTOMETRIC_INTERPRETATION,
            VR::CS,
            PrimitiveValue::from("MONOCHROME2"),
        ),
        DataElement::new(tags::ROWS, VR::US, dicom_value!(U16, [rows])),
        DataElement::new(tags::COLUMNS, VR::US, dicom_value!(U16, [columns])),
        DataElement::new(tags::PIXEL_REPRESENTATION, VR::US, dicom_value!(U16, [0])),
    ]
}

fn write_file(obj: InMemDicomObject) -> Vec<u8> {
    let file = obj
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
                .media_storage_sop_class_uid(uids::SECONDARY_CAPTURE_IMAGE_STORAGE)
                .media_storage_sop_instance_uid(SOP_INSTANCE_UID),
        )
        .expect("fixture should have a valid file meta group");
    let mut bytes = Vec::new();
    file.write_all(&mut bytes)
        .expect("fixture should be written to memory");
    bytes
}

/// A single frame, 8-bit monochrome image file.
pub fn monochrome8(rows: u16, columns: u16, samples: &[u8]) -> Vec<u8> {
    let mut elements = base_elements(rows, columns);
    elements.extend([
        DataElement::new(tags::BITS_ALLOCATED, VR::US, dicom_value!(U16, [8])),
        DataElement::new(tags::BITS_STORED, VR::US, dicom_value!(U16, [8])),
        DataElement::new(tags::HIGH_BIT, VR::US, dicom_value!(U16, [7])),
        DataElement::new(tags::PIXEL_DATA, VR::OB, PrimitiveValue::from(samples.to_vec())),
    ]);
    write_file(InMemDicomObject::from_element_iter(elements))
}

/// A single frame, 16-bit unsigned monochrome image file.
pub fn monochrome16(rows: u16, columns: u16, samples: &[u16]) -> Vec<u8> {
    let mut elements = base_elements(rows, columns);
    elements.extend([
        DataElement::new(tags::BITS_ALLOCATED, VR::US, dicom_value!(U16, [16])),
        DataElement::new(tags::BITS_STORED, VR::US, dicom_value!(U16, [16])),
        DataElement::new(tags::HIGH_BIT, VR::US, dicom_value!(U16, [15])),
        DataElement::new(
            tags::PIXEL_DATA,
            VR::OW,
            PrimitiveValue::U16(samples.iter().copied().collect()),
        ),
    ]);
    write_file(InMemDicomObject::from_element_iter(elements))
}

/// A file with header attributes but no pixel data.
pub fn without_pixel_data() -> Vec<u8> {
    write_file(InMemDicomObject::from_element_iter(base_elements(2, 2)))
}
